//! Internationalization (i18n) module: locale tag negotiation.
//!
//! Raw locale tags are parsed into typed subtags, negotiated against the
//! locales that actually have data, and used to look up localized strings.
//!
//! # Architecture
//!
//! - `subtag`: Subtag kinds, their surface patterns, and token classification
//! - `tag`: `ParsedTag`, the canonical structured form of a raw tag
//! - `negotiator`: Fixed-order fallback walk from a tag to a data-bearing subset
//! - `context`: Current locale with revertible history
//! - `store`: Locale packs, module structure, and the lookup operations
//! - `strings`: Built-in English pack and failure placeholders
//! - `validator`: Pack completeness and tag hygiene checks
//! - `metrics`: Negotiation outcome counters
//!
//! # Example
//!
//! ```
//! use locale_negotiator::i18n::{LocaleStore, LookupOptions};
//!
//! let store = LocaleStore::new();
//! store.add_module("SHOP", "cy", [("BASKET", "Basged")]);
//! store.set_locale("cy-GB");
//!
//! let shop = store.get_module("SHOP", &LookupOptions::default());
//! assert_eq!(shop["BASKET"], "Basged");
//! ```

mod context;
mod metrics;
mod negotiator;
mod store;
mod strings;
mod subtag;
mod tag;
mod validator;

pub use context::LocaleContext;
pub use metrics::{MetricsReport, NegotiationMetrics};
pub use negotiator::{candidates, negotiate, Negotiation, DEFAULT_LOCALE, NEGOTIATION_ORDER};
pub use store::{CheckOptions, CheckReport, Labels, LocaleStore, LookupOptions, ModulePack};
pub use strings::{
    missing_label, LocaleProperties, ENGLISH_PROPERTIES, NEGOTIATION_ERROR, PROPERTIES_MODULE,
};
pub use subtag::{classify, SubtagKind, SubtagMask};
pub use tag::{is_valid_tag, ParsedTag, TagError};
pub use validator::{PackValidator, ValidationReport};
