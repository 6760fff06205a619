use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BatchError;

/// Lists the regular files in `dir` whose extension is in `extensions`
///
/// Matching ignores case and a leading dot, so `".PNG"` accepts `map.png`.
/// The result is sorted by path.
///
/// # Errors
///
/// * `BatchError::Io` - the directory cannot be read
pub fn collect_inputs(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, BatchError> {
    let io_error = |source: std::io::Error| BatchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let wanted = normalize_extensions(extensions);

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, &wanted) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Lowercases and strips the leading dot of every extension.
pub fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// `wanted` must already be normalized.
pub fn has_extension(path: &Path, wanted: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| wanted.iter().any(|w| *w == ext))
}

/// `<output_dir>/<input stem>.png`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".png");
    output_dir.join(name)
}
