use std::path::Path;

use crate::path;

/// Lockfile name to the manifest it is generated from.
const LOCKFILE_MANIFESTS: &[(&str, &str)] = &[
    ("Gemfile.lock", "Gemfile"),
    ("package-lock.json", "package.json"),
    ("yarn.lock", "package.json"),
    ("Gopkg.lock", "Gopkg.toml"),
    ("go.sum", "go.mod"),
    ("composer.lock", "composer.json"),
    ("Podfile.lock", "Podfile"),
    ("poetry.lock", "pyproject.toml"),
];

pub fn manifest_for(file_name: &str) -> Option<&'static str> {
    LOCKFILE_MANIFESTS
        .iter()
        .find(|(lockfile, _)| *lockfile == file_name)
        .map(|(_, manifest)| *manifest)
}

/// Swaps a lockfile name at the end of `display_target_file` for its
/// manifest. Other paths come back unchanged.
pub fn manifest_path(display_target_file: &str) -> String {
    let display = Path::new(display_target_file);
    let manifest = display
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(manifest_for);
    match manifest {
        Some(manifest) => display.with_file_name(manifest).to_string_lossy().into_owned(),
        None => display_target_file.to_string(),
    }
}

/// Absolute manifest path for a scan target, relative paths being taken
/// from `work_dir`. An empty target stays empty.
pub fn target_file_path(work_dir: &str, display_target_file: &str) -> String {
    if display_target_file.is_empty() {
        return String::new();
    }
    let manifest = manifest_path(display_target_file);
    if Path::new(&manifest).is_absolute() {
        manifest
    } else {
        path::to_absolute_path(work_dir, &manifest)
    }
}
