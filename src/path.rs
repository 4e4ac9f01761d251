use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};

use percent_encoding::percent_decode_str;

use crate::error::{DecodeError, PathResolutionError};

/// Lexically normalizes `path`: drops `.` segments, resolves `..` against
/// preceding segments and collapses repeated separators.
pub(crate) fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = vec![];
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Joins `relative` under `base_dir`. A leading separator on `relative` does
/// not escape the base directory. Both empty gives an empty path.
pub fn to_absolute_path(base_dir: &str, relative: &str) -> String {
    if base_dir.is_empty() && relative.is_empty() {
        return String::new();
    }
    let joined = if base_dir.is_empty() {
        PathBuf::from(relative)
    } else {
        Path::new(base_dir).join(relative.trim_start_matches('/'))
    };
    clean(&joined).to_string_lossy().into_owned()
}

/// Percent-decodes a URI path. Every `%` must start a two digit hex escape.
pub fn decode_path(encoded: &str) -> Result<String, DecodeError> {
    let bytes = encoded.as_bytes();
    let bad_escape = bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .map(|(position, _)| position)
        .find(|&position| {
            !matches!(
                bytes.get(position + 1..position + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
        });
    if let Some(position) = bad_escape {
        return Err(DecodeError::InvalidEscape {
            position,
            escape: encoded[position..].chars().take(3).collect(),
        });
    }
    percent_decode_str(encoded)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Turns an encoded, base-relative artifact URI into an absolute path.
pub fn resolve_uri(base_dir: &str, uri: &str) -> Result<String, PathResolutionError> {
    decode_path(&to_absolute_path(base_dir, uri)).map_err(|kind| PathResolutionError {
        base_dir: base_dir.to_string(),
        uri: uri.to_string(),
        kind,
    })
}
