//! Subtag classification.
//!
//! A locale tag is made of up to four kinds of subtag. Each kind has its own
//! surface pattern, and a single token may match more than one kind (a short
//! lowercase token is both a valid language and a valid variant).

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::sync::OnceLock;

/// The category a subtag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SubtagKind {
    Language,
    Script,
    Region,
    Variant,
}

impl SubtagKind {
    /// All kinds in canonical tag order.
    pub const ALL: [SubtagKind; 4] = [
        SubtagKind::Language,
        SubtagKind::Script,
        SubtagKind::Region,
        SubtagKind::Variant,
    ];

    /// The mask bit for this kind.
    pub const fn bit(self) -> SubtagMask {
        match self {
            SubtagKind::Language => SubtagMask::LANGUAGE,
            SubtagKind::Script => SubtagMask::SCRIPT,
            SubtagKind::Region => SubtagMask::REGION,
            SubtagKind::Variant => SubtagMask::VARIANT,
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            SubtagKind::Language => {
                LANGUAGE_REGEX.get_or_init(|| Regex::new(r"^[a-z]{1,3}$").unwrap())
            }
            SubtagKind::Script => {
                SCRIPT_REGEX.get_or_init(|| Regex::new(r"^[A-Z][a-z]{3}$").unwrap())
            }
            SubtagKind::Region => {
                REGION_REGEX.get_or_init(|| Regex::new(r"^(?:[A-Z]{2}|[0-9]{3})$").unwrap())
            }
            SubtagKind::Variant => {
                VARIANT_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]{2,}$").unwrap())
            }
        }
    }

    /// Check whether `token` has the surface form of this kind.
    pub fn matches(self, token: &str) -> bool {
        self.pattern().is_match(token)
    }
}

impl fmt::Display for SubtagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubtagKind::Language => "language",
            SubtagKind::Script => "script",
            SubtagKind::Region => "region",
            SubtagKind::Variant => "variant",
        };
        f.write_str(name)
    }
}

// Patterns are compiled once and reused by every classification
static LANGUAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static SCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();
static REGION_REGEX: OnceLock<Regex> = OnceLock::new();
static VARIANT_REGEX: OnceLock<Regex> = OnceLock::new();

/// A set of subtag kinds, stored as a 4-bit mask.
///
/// Language=1, Script=2, Region=4, Variant=8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubtagMask(u8);

impl SubtagMask {
    pub const EMPTY: SubtagMask = SubtagMask(0);
    pub const LANGUAGE: SubtagMask = SubtagMask(1);
    pub const SCRIPT: SubtagMask = SubtagMask(2);
    pub const REGION: SubtagMask = SubtagMask(4);
    pub const VARIANT: SubtagMask = SubtagMask(8);

    /// Build a mask from raw bits, ignoring anything above the four known kinds.
    pub const fn from_bits(bits: u8) -> SubtagMask {
        SubtagMask(bits & 0b1111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: SubtagMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn has(self, kind: SubtagKind) -> bool {
        self.contains(kind.bit())
    }

    /// Kinds present in this mask, in canonical order.
    pub fn kinds(self) -> impl Iterator<Item = SubtagKind> {
        SubtagKind::ALL.into_iter().filter(move |kind| self.has(*kind))
    }
}

impl BitOr for SubtagMask {
    type Output = SubtagMask;

    fn bitor(self, rhs: SubtagMask) -> SubtagMask {
        SubtagMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for SubtagMask {
    fn bitor_assign(&mut self, rhs: SubtagMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SubtagMask {
    type Output = SubtagMask;

    fn bitand(self, rhs: SubtagMask) -> SubtagMask {
        SubtagMask(self.0 & rhs.0)
    }
}

/// Classify a single token.
///
/// Returns every kind whose pattern the token matches. Script never overlaps
/// with anything else. Language and variant can both be set, and so can region
/// and variant for three-digit regions; the parser's ordered scan decides.
pub fn classify(token: &str) -> SubtagMask {
    SubtagKind::ALL
        .into_iter()
        .filter(|kind| kind.matches(token))
        .fold(SubtagMask::EMPTY, |mask, kind| mask | kind.bit())
}
