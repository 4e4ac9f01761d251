use core::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::issue::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Sarif,
    Oss,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Sarif => write!(f, "SARIF"),
            InputFormat::Oss => write!(f, "OSS"),
        }
    }
}

/// Top-level payload could not be decoded. Carries the raw input for diagnostics.
#[derive(Error, Debug)]
#[error("failed to parse {format} JSON: {source}. Input: {payload}")]
pub struct ParseError {
    pub format: InputFormat,
    pub payload: String,
    pub source: serde_json::Error,
}

impl ParseError {
    pub fn new(format: InputFormat, data: &[u8], source: serde_json::Error) -> Self {
        ParseError {
            format,
            payload: String::from_utf8_lossy(data).into_owned(),
            source,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid URL escape {escape:?} at byte {position}")]
    InvalidEscape { position: usize, escape: String },
    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to convert URI to absolute path: base directory: {base_dir}, URI: {uri}: {kind}")]
pub struct PathResolutionError {
    pub base_dir: String,
    pub uri: String,
    pub kind: DecodeError,
}

/// Every per-location failure of one conversion call, in encounter order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct JoinedError(pub Vec<PathResolutionError>);

impl fmt::Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

/// Issues produced by a conversion together with the locations it had to skip.
///
/// A non-empty `errors` does not invalidate `issues`: both must be inspected.
#[derive(Debug, Default)]
pub struct Conversion {
    pub issues: Vec<Issue>,
    pub errors: Vec<PathResolutionError>,
}

impl Conversion {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn joined_error(&self) -> Option<JoinedError> {
        if self.errors.is_empty() {
            None
        } else {
            Some(JoinedError(self.errors.clone()))
        }
    }

    /// All-or-nothing view: any skipped location turns the whole call into an error.
    pub fn into_result(self) -> Result<Vec<Issue>, JoinedError> {
        if self.errors.is_empty() {
            Ok(self.issues)
        } else {
            Err(JoinedError(self.errors))
        }
    }
}
