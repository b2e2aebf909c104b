//! One-shot pattern match cache.
//!
//! Every `(event, pattern)` pair may claim a message once. Patterns are
//! compared by allocation: each compiled `Arc<Regex>` is its own key, and
//! clones of that `Arc` share it. The first
//! successful match stores its capture groups; from then on the pair is
//! spent and further attempts return `false` even though the pattern would
//! still match. Check and insert run under one lock, so concurrent handlers
//! cannot both claim the same pair.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use regex::Regex;

/// Capture groups of a successful match. Index 0 is the whole match;
/// groups that did not participate are `None`.
pub type Captures = Vec<Option<String>>;

/// Composite cache key. Holding the `Arc` keeps the pattern alive, so its
/// address cannot be reused by another pattern while the entry exists.
#[derive(Clone, Debug)]
struct MatchKey {
    event: String,
    pattern: Arc<Regex>,
}

impl MatchKey {
    fn new(event: &str, pattern: &Arc<Regex>) -> Self {
        Self {
            event: event.to_owned(),
            pattern: Arc::clone(pattern),
        }
    }
}

impl PartialEq for MatchKey {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event && Arc::ptr_eq(&self.pattern, &other.pattern)
    }
}

impl Eq for MatchKey {}

impl Hash for MatchKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event.hash(state);
        Arc::as_ptr(&self.pattern).hash(state);
    }
}

/// Per-message store of claimed `(event, pattern)` pairs.
#[derive(Debug, Default)]
pub struct MatchCache {
    entries: Mutex<HashMap<MatchKey, Captures>>,
}

impl MatchCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `pattern` against `haystack` unless the pair is already spent.
    ///
    /// Returns `true` only for the first successful match of the pair.
    /// A failed attempt stores nothing.
    pub fn claim(&self, pattern: &Arc<Regex>, event: &str, haystack: &str) -> bool {
        let key = MatchKey::new(event, pattern);
        let mut entries = self.entries.lock();
        if entries.contains_key(&key) {
            return false;
        }

        let Some(caps) = pattern.captures(haystack) else {
            return false;
        };
        let groups = caps
            .iter()
            .map(|group| group.map(|m| m.as_str().to_owned()))
            .collect();
        entries.insert(key, groups);
        true
    }

    /// Captures stored for the pair, if it has been claimed.
    pub fn get(&self, pattern: &Arc<Regex>, event: &str) -> Option<Captures> {
        self.entries
            .lock()
            .get(&MatchKey::new(event, pattern))
            .cloned()
    }

    /// Number of claimed pairs.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no pair has been claimed.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
