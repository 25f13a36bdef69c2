//! The downloadable result of a run

use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name under which processed text is offered
pub const ARTIFACT_FILE_NAME: &str = "texto_procesado.txt";

/// Media type of the processed text
pub const ARTIFACT_MEDIA_TYPE: &str = "text/plain; charset=utf-8";

/// Final text packaged with its file name and media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    content: String,
}

impl Artifact {
    /// Wrap the final text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Always [`ARTIFACT_FILE_NAME`]
    pub fn file_name(&self) -> &'static str {
        ARTIFACT_FILE_NAME
    }

    /// Always [`ARTIFACT_MEDIA_TYPE`]
    pub fn media_type(&self) -> &'static str {
        ARTIFACT_MEDIA_TYPE
    }

    /// The text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// UTF-8 bytes of the text
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Write the artifact into `dir`, returning the file path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(ARTIFACT_FILE_NAME);
        std::fs::write(&path, self.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = self.content.len(), "artifact written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_name_and_media_type() {
        let artifact = Artifact::new("Hola.");
        assert_eq!(artifact.file_name(), "texto_procesado.txt");
        assert_eq!(artifact.media_type(), "text/plain; charset=utf-8");
        assert_eq!(artifact.as_bytes(), b"Hola.");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = Artifact::new("Adiós.").write_to_dir(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "texto_procesado.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Adiós.");
    }
}
