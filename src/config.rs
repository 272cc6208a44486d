use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::i18n::{is_valid_tag, DEFAULT_LOCALE};

#[derive(Debug, Clone)]
pub struct Config {
    // Locale the store starts in
    pub default_locale: String,

    // Optional JSON file with locale packs
    pub pack_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale =
            std::env::var("LOCALE_DEFAULT").unwrap_or_else(|_| DEFAULT_LOCALE.to_string());
        if !is_valid_tag(&default_locale) {
            bail!("LOCALE_DEFAULT '{}' is not a valid locale tag", default_locale);
        }

        Ok(Self {
            default_locale,
            pack_file: std::env::var("LOCALE_PACK_FILE")
                .ok()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            pack_file: None,
        }
    }
}
