//! Input abstraction for rewriting runs
//!
//! A run always works on one complete text; these variants cover the places
//! that text usually comes from.

use crate::error::{EngineError, Result};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Unified input abstraction
pub enum Input {
    /// Direct text string
    Text(String),
    /// File path to read from
    File(PathBuf),
    /// Bytes to decode as UTF-8 text
    Bytes(Vec<u8>),
    /// Reader stream (stdin, an HTTP body, ...)
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f
                .debug_tuple("Text")
                .field(&format!("<{} bytes>", text.len()))
                .finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f
                .debug_tuple("Bytes")
                .field(&format!("<{} bytes>", bytes.len()))
                .finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<Reader>").finish(),
        }
    }
}

impl Input {
    /// Create input from a text string
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Input::Text(text.into())
    }

    /// Create input from a file path
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Read the whole input as UTF-8 text.
    ///
    /// A leading byte-order mark is dropped so it never reaches the first
    /// fragment.
    pub fn into_text(self) -> Result<String> {
        let (bytes, origin) = match self {
            Input::Text(text) => return Ok(strip_bom(text)),
            Input::File(path) => {
                let bytes = fs::read(&path)
                    .map_err(|e| EngineError::Io(format!("failed to read {}: {e}", path.display())))?;
                (bytes, path.display().to_string())
            }
            Input::Bytes(bytes) => (bytes, "bytes".to_string()),
            Input::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader
                    .read_to_end(&mut buffer)
                    .map_err(|e| EngineError::Io(format!("failed to read from stream: {e}")))?;
                (buffer, "stream".to_string())
            }
        };

        String::from_utf8(bytes)
            .map(strip_bom)
            .map_err(|e| EngineError::Encoding(format!("invalid UTF-8 in {origin}: {e}")))
    }

    /// Size in bytes when known without reading the input
    pub fn estimated_size(&self) -> Option<usize> {
        match self {
            Input::Text(text) => Some(text.len()),
            Input::Bytes(bytes) => Some(bytes.len()),
            Input::File(path) => fs::metadata(path).ok().map(|m| m.len() as usize),
            Input::Reader(_) => None,
        }
    }
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::File(path)
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}
