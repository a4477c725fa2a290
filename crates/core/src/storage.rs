//! Ephemeral result store.
//!
//! A string key-value contract between the analysis flow and whatever holds
//! the last result between views. The session controller only talks to the
//! [`ResultStore`] trait, never to a concrete medium.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Key holding the serialized analysis envelope.
pub const KEY_RESULTS: &str = "skinAnalysisResults";

/// Key holding the mode string of the stored analysis.
pub const KEY_ANALYSIS_TYPE: &str = "analysisType";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

pub trait ResultStore {
    fn put(&mut self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
    /// Remove every key.
    fn clear(&mut self);
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResultStore for MemoryStore {
    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
