use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Parse a JSON file directly from a buffered file stream
pub fn read_and_parse_json<T: DeserializeOwned>(path: &Path) -> std::io::Result<T> {
    let file = fs::File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create a directory if missing. Existing content is kept.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Base name used for every sample of one annotation file: the file name up to its first dot
pub fn output_stem(json_path: &Path) -> String {
    let file_name = json_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    sanitize_filename::sanitize(stem)
}
