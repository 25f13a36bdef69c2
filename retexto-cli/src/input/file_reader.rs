//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use retexto_engine::Input;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path value that means "read standard input"
pub const STDIN_PATH: &str = "-";

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()))
                .with_context(|| format!("Failed to read file: {}", path.display()));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Get file size in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        Ok(metadata.len())
    }

    /// Pipeline input for `path`, where `-` reads all of stdin
    pub fn open_input(path: &Path) -> Result<Input> {
        if path.as_os_str() == STDIN_PATH {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read standard input")?;
            return Ok(Input::from_bytes(buffer));
        }

        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }

        log::debug!(
            "Opening {} ({} bytes)",
            path.display(),
            Self::file_size(path)?
        );
        Ok(Input::from_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("acta.txt");

        let content = "Se abre la sesión.\nSe aprueba el acta.";
        fs::write(&file_path, content).unwrap();

        assert_eq!(FileReader::read_text(&file_path).unwrap(), content);
    }

    #[test]
    fn test_read_text_nonexistent_file() {
        let path = Path::new("/nonexistent/file.txt");
        let err = FileReader::read_text(path).unwrap_err();

        assert!(err.to_string().contains("Failed to read file"));
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_read_text_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("latin1.txt");
        fs::write(&file_path, [0x61, 0xf1, 0x6f]).unwrap();

        assert!(FileReader::read_text(&file_path).is_err());
    }

    #[test]
    fn test_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("sized.txt");
        fs::write(&file_path, "ñ".repeat(512)).unwrap();

        assert_eq!(FileReader::file_size(&file_path).unwrap(), 1024);
    }

    #[test]
    fn test_open_input_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("entrada.txt");
        fs::write(&file_path, "hola").unwrap();

        let input = FileReader::open_input(&file_path).unwrap();
        assert_eq!(input.into_text().unwrap(), "hola");
    }

    #[test]
    fn test_open_input_missing_file() {
        let err = FileReader::open_input(Path::new("/nonexistent/entrada.txt")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
