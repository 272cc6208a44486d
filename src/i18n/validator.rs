//! Locale pack validation module.
//!
//! Registration is deliberately forgiving: packs under invalid tags vanish
//! and missing labels fall back to less specific locales. This module lets
//! callers see what that forgiveness is hiding.

use crate::i18n::negotiator::{negotiate, Negotiation};
use crate::i18n::store::{LocaleStore, ModulePack};
use crate::i18n::tag::ParsedTag;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Validation report containing errors and warnings about locale data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Labels that cannot be resolved at all for some locale
    pub errors: Vec<String>,

    /// Data that is dropped, renamed, or only resolved through fallback
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for locale packs.
pub struct PackValidator;

impl PackValidator {
    /// Check every registered locale pack for labels it does not define.
    ///
    /// For each locale that has a pack for a module, every label known for
    /// that module is negotiated from that locale. A label resolved from a
    /// less specific locale is a warning; one that cannot be resolved at all
    /// is an error.
    pub fn validate(store: &LocaleStore) -> ValidationReport {
        let mut report = ValidationReport::new();

        for locale in store.locales() {
            let Some(tag) = ParsedTag::parse(&locale) else {
                continue;
            };

            for module in store.modules() {
                let Some(pack) = store.pack(&locale, &module) else {
                    continue;
                };

                for label in store.labels(&module) {
                    if pack.contains_key(&label) {
                        continue;
                    }

                    match negotiate(&tag, |candidate| {
                        store
                            .pack(candidate, &module)
                            .is_some_and(|labels| labels.contains_key(&label))
                    }) {
                        Negotiation::Found(winner) => report.warnings.push(format!(
                            "{} is missing {}.{} (falls back to {})",
                            locale, module, label, winner
                        )),
                        Negotiation::NotFound => report.errors.push(format!(
                            "{} cannot resolve {}.{}",
                            locale, module, label
                        )),
                    }
                }
            }
        }

        report
    }

    /// Check a JSON pack document for tags that registration would drop or
    /// rename.
    pub fn validate_json(json: &str) -> Result<ValidationReport> {
        let packs: BTreeMap<String, ModulePack> =
            serde_json::from_str(json).context("Failed to parse locale pack JSON")?;

        let mut report = ValidationReport::new();
        for (raw, modules) in &packs {
            match ParsedTag::parse(raw) {
                None => report.warnings.push(format!(
                    "Locale tag '{}' has no language subtag; {} module(s) would be ignored",
                    raw,
                    modules.len()
                )),
                Some(tag) if tag.canonical() != raw.as_str() => report.warnings.push(format!(
                    "Locale tag '{}' is stored as '{}'",
                    raw, tag
                )),
                Some(_) => {}
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Store Validation Tests ====================

    #[test]
    fn test_validate_fresh_store_is_clean() {
        let report = PackValidator::validate(&LocaleStore::new());
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_fallback_warning() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "en", [("BASKET", "Basket"), ("CHECKOUT", "Checkout")]);
        store.add_module("SHOP", "cy", [("BASKET", "Basged")]);

        let report = PackValidator::validate(&store);
        assert!(!report.has_errors());
        assert_eq!(
            report.warnings,
            vec!["cy is missing SHOP.CHECKOUT (falls back to en)"]
        );
    }

    #[test]
    fn test_validate_unresolvable_error() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "cy", [("BASKET", "Basged")]);
        store.add_module("SHOP", "fr", [("CHECKOUT", "Payer")]);

        let report = PackValidator::validate(&store);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.contains(&"cy cannot resolve SHOP.CHECKOUT".to_string()));
        assert!(report.errors.contains(&"fr cannot resolve SHOP.BASKET".to_string()));
    }

    #[test]
    fn test_validate_does_not_touch_metrics() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "cy", [("BASKET", "Basged")]);
        store.add_module("SHOP", "en", [("CHECKOUT", "Checkout")]);
        PackValidator::validate(&store);
        assert_eq!(store.metrics().negotiations(), 0);
    }

    // ==================== JSON Validation Tests ====================

    #[test]
    fn test_validate_json_clean() {
        let report = PackValidator::validate_json(r#"{"cy-GB": {"SHOP": {"BASKET": "Basged"}}}"#)
            .unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_json_invalid_tag() {
        let report = PackValidator::validate_json(r#"{"GB": {"SHOP": {}, "PROPERTIES": {}}}"#)
            .unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("no language subtag"));
        assert!(report.warnings[0].contains("2 module(s)"));
    }

    #[test]
    fn test_validate_json_renamed_tag() {
        let report = PackValidator::validate_json(r#"{"GB-cy-1-en-US": {}}"#).unwrap();
        assert_eq!(report.warnings, vec!["Locale tag 'GB-cy-1-en-US' is stored as 'cy-US'"]);
    }

    #[test]
    fn test_validate_json_malformed() {
        assert!(PackValidator::validate_json("[]").is_err());
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_validation_report_with_error() {
        let mut report = ValidationReport::new();
        report.errors.push("Test error".to_string());

        assert!(!report.is_clean());
        assert!(report.has_errors());
        assert!(!report.has_warnings());
    }
}
