//! Locale negotiation over a fixed specificity lattice.
//!
//! Given a parsed tag and a predicate telling whether a candidate tag has
//! data, the negotiator tries subsets of the tag in a fixed order and returns
//! the first one the predicate accepts, falling back to English last.
//!
//! The order favors region over script: a tag with both degrades to its
//! region-bearing subsets before its script-bearing ones. This is policy
//! and changing it changes which pack wins when several partial packs exist.

use crate::i18n::subtag::SubtagMask;
use crate::i18n::tag::ParsedTag;
use tracing::{debug, trace};

/// Tag tried after every subset of the requested tag has failed.
pub const DEFAULT_LOCALE: &str = "en";

const L: SubtagMask = SubtagMask::LANGUAGE;
const S: SubtagMask = SubtagMask::SCRIPT;
const R: SubtagMask = SubtagMask::REGION;
const V: SubtagMask = SubtagMask::VARIANT;

/// Subset combinations in the order they are tried.
pub const NEGOTIATION_ORDER: [SubtagMask; 8] = [
    SubtagMask::from_bits(L.bits() | R.bits() | V.bits()),
    SubtagMask::from_bits(L.bits() | R.bits()),
    SubtagMask::from_bits(L.bits() | S.bits() | R.bits() | V.bits()),
    SubtagMask::from_bits(L.bits() | S.bits() | R.bits()),
    SubtagMask::from_bits(L.bits() | S.bits() | V.bits()),
    SubtagMask::from_bits(L.bits() | S.bits()),
    SubtagMask::from_bits(L.bits() | V.bits()),
    L,
];

/// Outcome of a negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// The winning tag string.
    Found(String),
    NotFound,
}

impl Negotiation {
    pub fn found(&self) -> Option<&str> {
        match self {
            Negotiation::Found(tag) => Some(tag),
            Negotiation::NotFound => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Negotiation::Found(tag) => Some(tag),
            Negotiation::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Negotiation::Found(_))
    }
}

/// Candidate tags for `tag`, in the order they are tried.
///
/// Combinations needing a subtag the tag lacks are skipped. The list always
/// ends with the default locale.
pub fn candidates(tag: &ParsedTag) -> Vec<String> {
    NEGOTIATION_ORDER
        .iter()
        .filter(|combination| tag.mask().contains(**combination))
        .map(|combination| tag.subset(*combination))
        .chain(std::iter::once(DEFAULT_LOCALE.to_string()))
        .collect()
}

/// Negotiate `tag` against `exists`.
///
/// Returns the first candidate (see [`candidates`]) for which `exists` is
/// true. The walk has no side effects of its own, so the same tag and the
/// same predicate answers always give the same result.
///
/// # Example
/// ```
/// use locale_negotiator::i18n::{negotiate, Negotiation, ParsedTag};
///
/// let tag = ParsedTag::parse("en-Runr-GB-scouse").unwrap();
/// let result = negotiate(&tag, |candidate| candidate == "en-GB" || candidate == "en");
/// assert_eq!(result, Negotiation::Found("en-GB".to_string()));
/// ```
pub fn negotiate<F>(tag: &ParsedTag, mut exists: F) -> Negotiation
where
    F: FnMut(&str) -> bool,
{
    for candidate in candidates(tag) {
        let accepted = exists(&candidate);
        trace!(requested = %tag, candidate = %candidate, accepted, "Negotiation candidate");
        if accepted {
            debug!(requested = %tag, negotiated = %candidate, "Negotiated locale");
            return Negotiation::Found(candidate);
        }
    }

    debug!(requested = %tag, "No negotiated locale");
    Negotiation::NotFound
}
