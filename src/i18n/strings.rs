//! Built-in locale data and the fixed strings the store renders on failure.

/// Module holding per-locale metadata
pub const PROPERTIES_MODULE: &str = "PROPERTIES";

/// Locale metadata registered under `PROPERTIES` for a locale.
#[derive(Debug, Clone)]
pub struct LocaleProperties {
    /// Tag the properties are registered under
    pub tag: &'static str,

    /// Name of the language in the language itself (label `LANGUAGE`)
    pub language: &'static str,

    /// Text direction, "ltr" or "rtl" (label `DIR`)
    pub dir: &'static str,
}

impl LocaleProperties {
    /// Labels and values as registered in the store.
    pub fn labels(&self) -> [(&'static str, &'static str); 2] {
        [("LANGUAGE", self.language), ("DIR", self.dir)]
    }
}

/// English properties, pre-registered in every store
pub const ENGLISH_PROPERTIES: LocaleProperties = LocaleProperties {
    tag: "en",
    language: "English",
    dir: "ltr",
};

/// Value reported by `check_locale` where negotiation fails
pub const NEGOTIATION_ERROR: &str = "**error** - no negotiated value exists";

/// Placeholder value for a label that cannot be negotiated.
pub fn missing_label(module: &str, label: &str, locale: &str) -> String {
    format!("[Error! No {}.{} on {}]", module, label, locale)
}
