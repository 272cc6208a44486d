//! Current-locale tracking with revertible history.
//!
//! A `LocaleContext` belongs to exactly one store; there is no process-wide
//! current locale. Setting a locale pushes the previous one onto a history
//! stack and reverting pops it, never going below the first locale.

use crate::i18n::negotiator::DEFAULT_LOCALE;
use crate::i18n::tag::ParsedTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    current: ParsedTag,
    history: Vec<ParsedTag>,
}

impl LocaleContext {
    /// Create a context whose first locale is `initial`.
    pub fn new(initial: ParsedTag) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Create a context from a raw tag, using the default locale when the
    /// tag does not parse.
    pub fn from_tag(raw: &str) -> Self {
        Self::new(ParsedTag::parse(raw).unwrap_or_else(default_tag))
    }

    pub fn current(&self) -> &ParsedTag {
        &self.current
    }

    /// Number of locales that `revert` can step back through.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Make `tag` current, remembering the previous locale.
    pub fn set(&mut self, tag: ParsedTag) {
        let previous = std::mem::replace(&mut self.current, tag);
        self.history.push(previous);
    }

    /// Restore the previous locale.
    ///
    /// Returns `false` and leaves the context untouched when there is no
    /// history left.
    pub fn revert(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new(default_tag())
    }
}

/// # Panics
/// Never in practice: `DEFAULT_LOCALE` is a constant bare language subtag.
fn default_tag() -> ParsedTag {
    ParsedTag::parse(DEFAULT_LOCALE).expect("Default locale should always parse")
}
