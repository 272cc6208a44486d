//! Locale store: localized strings keyed by locale, module and label.
//!
//! The store keeps two append-only maps: the locale packs themselves
//! (`canonical tag -> module -> label -> value`) and the structure of every
//! module (`module -> labels ever registered`, across all locales). Queries
//! negotiate each label separately, so a module may resolve some labels from
//! `cy-GB` and others from `cy` or `en`.
//!
//! All state sits behind a single mutex; every operation takes `&self`.

use crate::i18n::context::LocaleContext;
use crate::i18n::metrics::NegotiationMetrics;
use crate::i18n::negotiator::{negotiate, Negotiation};
use crate::i18n::strings::{
    missing_label, ENGLISH_PROPERTIES, NEGOTIATION_ERROR, PROPERTIES_MODULE,
};
use crate::i18n::tag::ParsedTag;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Label -> value for one module.
pub type Labels = BTreeMap<String, String>;

/// Module -> labels, the shape of a locale pack.
pub type ModulePack = BTreeMap<String, Labels>;

/// Options for value lookups.
#[derive(Debug, Clone, Default)]
pub struct LookupOptions {
    /// Locale to negotiate instead of the current one. Ignored when invalid.
    pub locale: Option<String>,
}

impl LookupOptions {
    pub fn locale(tag: impl Into<String>) -> Self {
        Self {
            locale: Some(tag.into()),
        }
    }
}

/// Options narrowing a `check_locale` report.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub module: Option<String>,

    /// Only used together with `module`
    pub label: Option<String>,
}

impl CheckOptions {
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            label: None,
        }
    }

    pub fn label(module: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            label: Some(label.into()),
        }
    }
}

/// Result of `check_locale`: which tag each label negotiates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckReport {
    /// One module and label
    Label(String),
    /// Label -> negotiated tag for one module
    Module(BTreeMap<String, String>),
    /// Module -> label -> negotiated tag for everything
    All(BTreeMap<String, BTreeMap<String, String>>),
}

#[derive(Debug)]
struct StoreState {
    packs: HashMap<String, ModulePack>,
    structure: BTreeMap<String, BTreeSet<String>>,
    locale: LocaleContext,
}

impl StoreState {
    fn has_label(&self, tag: &str, module: &str, label: &str) -> bool {
        self.packs
            .get(tag)
            .and_then(|modules| modules.get(module))
            .is_some_and(|labels| labels.contains_key(label))
    }

    fn value(&self, tag: &str, module: &str, label: &str) -> Option<&String> {
        self.packs.get(tag)?.get(module)?.get(label)
    }

    /// Explicit locale if given and valid, else the current one.
    fn effective_locale(&self, opts: &LookupOptions) -> ParsedTag {
        opts.locale
            .as_deref()
            .and_then(ParsedTag::parse)
            .unwrap_or_else(|| self.locale.current().clone())
    }
}

/// Localized string storage with locale negotiation.
#[derive(Debug)]
pub struct LocaleStore {
    state: Mutex<StoreState>,
    metrics: NegotiationMetrics,
}

impl LocaleStore {
    /// Create a store with the built-in English pack and `en` as locale.
    pub fn new() -> Self {
        Self::with_context(LocaleContext::default())
    }

    /// Create a store whose first locale is `tag` (`en` if it does not parse).
    pub fn with_locale(tag: &str) -> Self {
        Self::with_context(LocaleContext::from_tag(tag))
    }

    /// Create a store around an existing locale context.
    pub fn with_context(locale: LocaleContext) -> Self {
        let store = Self {
            state: Mutex::new(StoreState {
                packs: HashMap::new(),
                structure: BTreeMap::new(),
                locale,
            }),
            metrics: NegotiationMetrics::new(),
        };
        store.add_module(
            PROPERTIES_MODULE,
            ENGLISH_PROPERTIES.tag,
            ENGLISH_PROPERTIES.labels(),
        );
        store
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // Writers never leave the maps half-updated, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn metrics(&self) -> &NegotiationMetrics {
        &self.metrics
    }

    // ==================== Registration ====================

    /// Merge `data` into the `module` pack of `tag`.
    ///
    /// Existing labels are overwritten and new ones added. An invalid tag
    /// makes this a no-op.
    pub fn add_module<I, K, V>(&self, module: &str, tag: &str, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let Some(parsed) = ParsedTag::parse(tag) else {
            debug!(module, tag, "Ignoring locale module with invalid tag");
            return;
        };

        let mut state = self.state();
        let StoreState {
            packs, structure, ..
        } = &mut *state;

        let labels = packs
            .entry(parsed.canonical().to_string())
            .or_default()
            .entry(module.to_string())
            .or_default();
        let known = structure.entry(module.to_string()).or_default();

        let mut count = 0;
        for (label, value) in data {
            let label = label.into();
            known.insert(label.clone());
            labels.insert(label, value.into());
            count += 1;
        }

        debug!(module, locale = %parsed, labels = count, "Added locale module");
    }

    /// Register every module of a locale pack under `tag`.
    pub fn add_pack<P, I, K, V>(&self, tag: &str, data: P)
    where
        P: IntoIterator<Item = (String, I)>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (module, labels) in data {
            self.add_module(&module, tag, labels);
        }
    }

    /// Load locale packs from a JSON document shaped
    /// `{ "tag": { "module": { "label": "value" } } }`.
    ///
    /// Packs under invalid tags are skipped like any other registration.
    ///
    /// # Returns
    /// The number of packs read from the document.
    pub fn load_json(&self, json: &str) -> Result<usize> {
        let packs: BTreeMap<String, ModulePack> =
            serde_json::from_str(json).context("Failed to parse locale pack JSON")?;

        let count = packs.len();
        for (tag, modules) in packs {
            self.add_pack(&tag, modules);
        }
        Ok(count)
    }

    /// Load locale packs from a JSON file (see [`LocaleStore::load_json`]).
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale pack file {}", path.display()))?;
        let count = self
            .load_json(&json)
            .with_context(|| format!("Invalid locale pack file {}", path.display()))?;

        info!(path = %path.display(), packs = count, "Loaded locale packs");
        Ok(count)
    }

    // ==================== Current Locale ====================

    /// Make `tag` the current locale. An invalid tag makes this a no-op.
    pub fn set_locale(&self, tag: &str) {
        match ParsedTag::parse(tag) {
            Some(parsed) => {
                debug!(locale = %parsed, "Setting locale");
                self.state().locale.set(parsed);
            }
            None => {
                debug!(tag, "Ignoring invalid locale");
            }
        }
    }

    /// Go back to the locale that was current before the last `set_locale`.
    ///
    /// Does nothing when there is no earlier locale.
    pub fn revert_locale(&self) {
        let mut state = self.state();
        if state.locale.revert() {
            debug!(locale = %state.locale.current(), "Reverted locale");
        }
    }

    pub fn current_locale(&self) -> ParsedTag {
        self.state().locale.current().clone()
    }

    /// How many times `revert_locale` can still step back.
    pub fn locale_depth(&self) -> usize {
        self.state().locale.depth()
    }

    // ==================== Queries ====================

    fn negotiate_label(
        &self,
        state: &StoreState,
        tag: &ParsedTag,
        module: &str,
        label: &str,
    ) -> Negotiation {
        let outcome = negotiate(tag, |candidate| state.has_label(candidate, module, label));
        self.metrics.record(tag, &outcome);
        outcome
    }

    fn lookup(&self, state: &StoreState, tag: &ParsedTag, module: &str, label: &str) -> String {
        self.negotiate_label(state, tag, module, label)
            .found()
            .and_then(|winner| state.value(winner, module, label))
            .cloned()
            .unwrap_or_else(|| missing_label(module, label, tag.canonical()))
    }

    /// Fetch every label of `module`.
    ///
    /// The result holds exactly the labels ever registered for the module,
    /// each with its negotiated value or an error placeholder.
    pub fn get_module(&self, module: &str, opts: &LookupOptions) -> Labels {
        let state = self.state();
        let tag = state.effective_locale(opts);

        state
            .structure
            .get(module)
            .into_iter()
            .flatten()
            .map(|label| (label.clone(), self.lookup(&state, &tag, module, label)))
            .collect()
    }

    /// Fetch a single label of `module`, or its error placeholder.
    pub fn get(&self, module: &str, label: &str, opts: &LookupOptions) -> String {
        let state = self.state();
        let tag = state.effective_locale(opts);
        self.lookup(&state, &tag, module, label)
    }

    /// Report which tag each label would negotiate to for `tag`.
    ///
    /// Read-only: the current locale is not used or changed. Failed
    /// negotiations (including an invalid `tag`) show `NEGOTIATION_ERROR`.
    pub fn check_locale(&self, tag: &str, opts: &CheckOptions) -> CheckReport {
        let state = self.state();
        let parsed = ParsedTag::parse(tag);

        let check = |module: &str, label: &str| -> String {
            parsed
                .as_ref()
                .and_then(|parsed| {
                    self.negotiate_label(&state, parsed, module, label)
                        .into_option()
                })
                .unwrap_or_else(|| NEGOTIATION_ERROR.to_string())
        };

        let check_module = |module: &str| -> BTreeMap<String, String> {
            state
                .structure
                .get(module)
                .into_iter()
                .flatten()
                .map(|label| (label.clone(), check(module, label)))
                .collect()
        };

        match (&opts.module, &opts.label) {
            (Some(module), Some(label)) => {
                CheckReport::Label(check(module.as_str(), label.as_str()))
            }
            (Some(module), None) => CheckReport::Module(check_module(module.as_str())),
            (None, _) => CheckReport::All(
                state
                    .structure
                    .keys()
                    .map(|module| (module.clone(), check_module(module)))
                    .collect(),
            ),
        }
    }

    // ==================== Enumeration ====================

    /// Every module ever registered, in name order.
    pub fn modules(&self) -> Vec<String> {
        self.state().structure.keys().cloned().collect()
    }

    /// Every label ever registered for `module`, across all locales.
    pub fn labels(&self, module: &str) -> Vec<String> {
        self.state()
            .structure
            .get(module)
            .map(|labels| labels.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Canonical tags that have a locale pack, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.state().packs.keys().cloned().collect();
        locales.sort();
        locales
    }

    /// The raw pack registered under exactly `tag` for `module`, without
    /// negotiation.
    pub fn pack(&self, tag: &str, module: &str) -> Option<Labels> {
        let parsed = ParsedTag::parse(tag)?;
        self.state()
            .packs
            .get(parsed.canonical())?
            .get(module)
            .cloned()
    }
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn welsh_store() -> LocaleStore {
        let store = LocaleStore::new();
        store.add_module("SHOP", "en", [("BASKET", "Basket"), ("CHECKOUT", "Checkout")]);
        store.add_module("SHOP", "cy", [("BASKET", "Basged")]);
        store.add_module("SHOP", "cy-GB", [("CHECKOUT", "Talu")]);
        store
    }

    // ==================== Bootstrap Tests ====================

    #[test]
    fn test_new_store_has_english_properties() {
        let store = LocaleStore::new();
        let properties = store.get_module("PROPERTIES", &LookupOptions::default());
        assert_eq!(properties.get("LANGUAGE").map(String::as_str), Some("English"));
        assert_eq!(properties.get("DIR").map(String::as_str), Some("ltr"));
        assert_eq!(store.current_locale().canonical(), "en");
    }

    #[test]
    fn test_with_locale() {
        assert_eq!(LocaleStore::with_locale("cy-GB").current_locale().canonical(), "cy-GB");
        assert_eq!(LocaleStore::with_locale("GB").current_locale().canonical(), "en");
    }

    // ==================== Registration Tests ====================

    #[test]
    fn test_add_module_invalid_tag_is_noop() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "GB", [("BASKET", "Basket")]);
        assert!(store.labels("SHOP").is_empty());
        assert_eq!(store.locales(), vec!["en"]);
    }

    #[test]
    fn test_add_module_merges_and_overwrites() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "en", [("BASKET", "Basket")]);
        store.add_module("SHOP", "en", [("BASKET", "Cart"), ("CHECKOUT", "Checkout")]);

        let pack = store.pack("en", "SHOP").unwrap();
        assert_eq!(pack.len(), 2);
        assert_eq!(pack["BASKET"], "Cart");
    }

    #[test]
    fn test_add_module_uses_canonical_tag() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "GB-cy-1-en-US", [("BASKET", "Basged")]);
        assert!(store.pack("cy-US", "SHOP").is_some());
        assert!(store.locales().contains(&"cy-US".to_string()));
    }

    #[test]
    fn test_add_pack() {
        let store = LocaleStore::new();
        let mut pack = ModulePack::new();
        pack.insert("SHOP".to_string(), Labels::from([("BASKET".to_string(), "Basged".to_string())]));
        pack.insert("PROPERTIES".to_string(), Labels::from([("LANGUAGE".to_string(), "Cymraeg".to_string())]));
        store.add_pack("cy", pack);

        assert_eq!(store.modules(), vec!["PROPERTIES", "SHOP"]);
        assert_eq!(store.get("PROPERTIES", "LANGUAGE", &LookupOptions::locale("cy")), "Cymraeg");
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_module_negotiates_per_label() {
        let store = welsh_store();
        let shop = store.get_module("SHOP", &LookupOptions::locale("cy-GB"));
        assert_eq!(shop["BASKET"], "Basged");
        assert_eq!(shop["CHECKOUT"], "Talu");
    }

    #[test]
    fn test_get_module_uses_current_locale() {
        let store = welsh_store();
        store.set_locale("cy");
        let shop = store.get_module("SHOP", &LookupOptions::default());
        assert_eq!(shop["BASKET"], "Basged");
        assert_eq!(shop["CHECKOUT"], "Checkout");
    }

    #[test]
    fn test_get_module_invalid_override_uses_current() {
        let store = welsh_store();
        store.set_locale("cy-GB");
        let shop = store.get_module("SHOP", &LookupOptions::locale("GB"));
        assert_eq!(shop["CHECKOUT"], "Talu");
    }

    #[test]
    fn test_get_module_placeholder() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "cy", [("BASKET", "Basged")]);
        let shop = store.get_module("SHOP", &LookupOptions::locale("fr-FR"));
        assert_eq!(shop["BASKET"], "[Error! No SHOP.BASKET on fr-FR]");
    }

    #[test]
    fn test_get_module_unknown_module_is_empty() {
        let store = LocaleStore::new();
        assert!(store.get_module("NOPE", &LookupOptions::default()).is_empty());
    }

    #[test]
    fn test_get_single_label() {
        let store = welsh_store();
        assert_eq!(store.get("SHOP", "BASKET", &LookupOptions::locale("cy-GB")), "Basged");
        assert_eq!(
            store.get("SHOP", "MISSING", &LookupOptions::default()),
            "[Error! No SHOP.MISSING on en]"
        );
    }

    // ==================== Locale Stack Tests ====================

    #[test]
    fn test_set_and_revert_locale() {
        let store = LocaleStore::new();
        store.set_locale("cy-GB");
        assert_eq!(store.current_locale().canonical(), "cy-GB");
        assert_eq!(store.locale_depth(), 1);

        store.revert_locale();
        assert_eq!(store.current_locale().canonical(), "en");
        store.revert_locale();
        assert_eq!(store.current_locale().canonical(), "en");
        assert_eq!(store.locale_depth(), 0);
    }

    #[test]
    fn test_set_invalid_locale_is_noop() {
        let store = LocaleStore::new();
        store.set_locale("GB");
        assert_eq!(store.current_locale().canonical(), "en");
        assert_eq!(store.locale_depth(), 0);
    }

    #[test]
    fn test_stores_are_independent() {
        let first = LocaleStore::new();
        let second = LocaleStore::new();
        first.set_locale("cy");
        first.add_module("SHOP", "cy", [("BASKET", "Basged")]);

        assert_eq!(second.current_locale().canonical(), "en");
        assert!(second.labels("SHOP").is_empty());
    }

    // ==================== check_locale Tests ====================

    #[test]
    fn test_check_locale_label() {
        let store = welsh_store();
        assert_eq!(
            store.check_locale("cy-GB", &CheckOptions::label("SHOP", "BASKET")),
            CheckReport::Label("cy".to_string())
        );
    }

    #[test]
    fn test_check_locale_module() {
        let store = welsh_store();
        let CheckReport::Module(report) = store.check_locale("cy-GB", &CheckOptions::module("SHOP")) else {
            panic!("expected module report");
        };
        assert_eq!(report["BASKET"], "cy");
        assert_eq!(report["CHECKOUT"], "cy-GB");
    }

    #[test]
    fn test_check_locale_all() {
        let store = welsh_store();
        let CheckReport::All(report) = store.check_locale("fr", &CheckOptions::default()) else {
            panic!("expected full report");
        };
        assert_eq!(report["SHOP"]["BASKET"], "en");
        assert_eq!(report["PROPERTIES"]["DIR"], "en");
    }

    #[test]
    fn test_check_locale_failure() {
        let store = LocaleStore::new();
        store.add_module("SHOP", "cy", [("BASKET", "Basged")]);
        assert_eq!(
            store.check_locale("fr", &CheckOptions::label("SHOP", "BASKET")),
            CheckReport::Label(NEGOTIATION_ERROR.to_string())
        );
        assert_eq!(
            store.check_locale("GB", &CheckOptions::label("PROPERTIES", "DIR")),
            CheckReport::Label(NEGOTIATION_ERROR.to_string())
        );
    }

    #[test]
    fn test_check_locale_does_not_touch_current() {
        let store = welsh_store();
        store.check_locale("cy-GB", &CheckOptions::default());
        assert_eq!(store.current_locale().canonical(), "en");
    }

    // ==================== JSON Loading Tests ====================

    #[test]
    fn test_load_json() {
        let store = LocaleStore::new();
        let count = store
            .load_json(r#"{"cy": {"PROPERTIES": {"LANGUAGE": "Cymraeg"}}, "GB": {"X": {"Y": "Z"}}}"#)
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.get("PROPERTIES", "LANGUAGE", &LookupOptions::locale("cy-GB")), "Cymraeg");
        assert!(store.labels("X").is_empty());
    }

    #[test]
    fn test_load_json_malformed() {
        let store = LocaleStore::new();
        let err = store.load_json("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse locale pack JSON"));
    }

    // ==================== Metrics Tests ====================

    #[test]
    fn test_metrics_count_negotiations() {
        let store = welsh_store();
        store.get_module("SHOP", &LookupOptions::locale("cy-GB"));
        let report = store.metrics().report();
        assert_eq!(report.negotiations, 2);
        assert_eq!(report.exact_hits, 1);
        assert_eq!(report.fallbacks, 1);
    }
}
