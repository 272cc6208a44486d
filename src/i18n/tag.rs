//! Parsed locale tags.
//!
//! This module provides `ParsedTag`, the structured form of a raw tag such as
//! `"en-Runr-GB-scouse"`. Parsing never fails loudly on junk: tokens that do
//! not fit are dropped, and only a missing language subtag rejects the tag.

use crate::i18n::subtag::{classify, SubtagKind, SubtagMask};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned by the strict (`FromStr`) parsing path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("locale tag '{0}' has no language subtag")]
    NoLanguage(String),
}

/// A validated locale tag split into its subtags.
///
/// Two tags with the same canonical string are the same tag for storage and
/// lookup purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedTag {
    canonical: String,
    mask: SubtagMask,
    language: String,
    script: Option<String>,
    region: Option<String>,
    variant: Option<String>,
}

impl ParsedTag {
    /// Parse a raw tag.
    ///
    /// Each subtag kind is claimed in the order language, script, region,
    /// variant by the first unclaimed token at or after the previous claim.
    /// Unclaimed tokens are discarded.
    ///
    /// # Returns
    /// * `Some(ParsedTag)` if a language subtag was found
    /// * `None` otherwise (including the empty string)
    ///
    /// # Example
    /// ```
    /// use locale_negotiator::i18n::ParsedTag;
    ///
    /// let tag = ParsedTag::parse("GB-cy-1-en-US").unwrap();
    /// assert_eq!(tag.canonical(), "cy-US");
    /// ```
    pub fn parse(raw: &str) -> Option<ParsedTag> {
        let mut tokens: Vec<Option<&str>> = raw.split('-').map(Some).collect();
        let mut claimed: [Option<String>; 4] = Default::default();
        let mut mask = SubtagMask::EMPTY;
        let mut cursor = 0;

        for (slot, kind) in SubtagKind::ALL.into_iter().enumerate() {
            let found = tokens
                .iter()
                .enumerate()
                .skip(cursor)
                .find_map(|(pos, token)| match token {
                    Some(token) if classify(token).has(kind) => Some(pos),
                    _ => None,
                });

            if let Some(pos) = found {
                claimed[slot] = tokens[pos].take().map(str::to_string);
                mask |= kind.bit();
                cursor = pos;
            }
        }

        let [language, script, region, variant] = claimed;
        let language = language?;

        let canonical = std::iter::once(language.as_str())
            .chain(script.as_deref())
            .chain(region.as_deref())
            .chain(variant.as_deref())
            .collect::<Vec<_>>()
            .join("-");

        Some(ParsedTag {
            canonical,
            mask,
            language,
            script,
            region,
            variant,
        })
    }

    /// The canonical string form (e.g., "en-GB").
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Which subtag kinds are present. Always contains `Language`.
    pub fn mask(&self) -> SubtagMask {
        self.mask
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Get the subtag of a given kind, if present.
    pub fn subtag(&self, kind: SubtagKind) -> Option<&str> {
        match kind {
            SubtagKind::Language => Some(self.language()),
            SubtagKind::Script => self.script(),
            SubtagKind::Region => self.region(),
            SubtagKind::Variant => self.variant(),
        }
    }

    /// Build the subset tag made of the subtags selected by `mask`.
    ///
    /// Kinds in `mask` that this tag lacks are skipped.
    pub fn subset(&self, mask: SubtagMask) -> String {
        mask.kinds()
            .filter_map(|kind| self.subtag(kind))
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Check whether a raw tag would be accepted by the parser.
///
/// Registration and locale switching silently ignore invalid tags; callers
/// who want to reject them up front can use this.
pub fn is_valid_tag(raw: &str) -> bool {
    ParsedTag::parse(raw).is_some()
}

impl FromStr for ParsedTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParsedTag::parse(s).ok_or_else(|| TagError::NoLanguage(s.to_string()))
    }
}

impl fmt::Display for ParsedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for ParsedTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}
