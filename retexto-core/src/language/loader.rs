//! Language configuration loader
//!
//! Embedded configurations are parsed once and cached.

use crate::{
    error::{CoreError, Result},
    language::config::LanguageConfig,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Language used when none is requested
pub const DEFAULT_LANGUAGE: &str = "es";

static EMBEDDED: OnceLock<HashMap<String, Arc<LanguageConfig>>> = OnceLock::new();

macro_rules! embed_language_config {
    ($code:expr, $alias:expr, $path:expr) => {
        ($code, $alias, include_str!($path))
    };
}

fn load_embedded_configs() -> HashMap<String, Arc<LanguageConfig>> {
    let mut configs = HashMap::new();

    let embedded = [
        embed_language_config!("es", "spanish", "../../configs/languages/spanish.toml"),
        embed_language_config!("en", "english", "../../configs/languages/english.toml"),
    ];

    for (code, alias, content) in embedded {
        match LanguageConfig::from_toml_str(content) {
            Ok(config) if config.metadata.code == code => {
                let config = Arc::new(config);
                configs.insert(code.to_string(), Arc::clone(&config));
                configs.insert(alias.to_string(), config);
            }
            Ok(config) => {
                tracing::error!(
                    expected = code,
                    actual = %config.metadata.code,
                    "embedded language config code mismatch"
                );
            }
            Err(e) => {
                tracing::error!(code, error = %e, "failed to load embedded language config");
            }
        }
    }

    configs
}

/// Embedded configuration for a language code or name
pub fn get_config(code: &str) -> Result<Arc<LanguageConfig>> {
    EMBEDDED
        .get_or_init(load_embedded_configs)
        .get(&code.to_lowercase())
        .cloned()
        .ok_or_else(|| CoreError::UnsupportedLanguage(code.to_string()))
}

/// Codes of the embedded languages, sorted
pub fn list_languages() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = EMBEDDED
        .get_or_init(load_embedded_configs)
        .values()
        .map(|config| config.metadata.code.as_str())
        .collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_unsupported() {
        match get_config("nonexistent") {
            Err(CoreError::UnsupportedLanguage(code)) => assert_eq!(code, "nonexistent"),
            other => panic!("Expected UnsupportedLanguage error, got {other:?}"),
        }
    }

    #[test]
    fn test_get_config_spanish() {
        let config = get_config("es").expect("Spanish config should exist");
        assert_eq!(config.metadata.code, "es");
        assert_eq!(config.metadata.name, "Spanish");
        assert!(!config.punctuation.discourse_markers.is_empty());
    }

    #[test]
    fn test_aliases_share_config() {
        let by_code = get_config("en").unwrap();
        let by_name = get_config("English").unwrap();
        assert!(Arc::ptr_eq(&by_code, &by_name));
    }

    #[test]
    fn test_list_languages() {
        assert_eq!(list_languages(), vec!["en", "es"]);
    }
}
