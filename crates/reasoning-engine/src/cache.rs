use dashmap::DashMap;
use insight_store::Insight;

/// Most recent insight set per file path.
///
/// Entries are only ever replaced whole. A file analyzed with no findings maps
/// to an empty set, which is distinct from a file never analyzed.
#[derive(Debug, Default)]
pub struct InsightCache {
    entries: DashMap<String, Vec<Insight>>,
}

impl InsightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current set for `file_path`, or an empty set if none was recorded.
    pub fn get(&self, file_path: &str) -> Vec<Insight> {
        self.entries
            .get(file_path)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn set(&self, file_path: &str, insights: Vec<Insight>) {
        self.entries.insert(file_path.to_string(), insights);
    }

    pub fn contains(&self, file_path: &str) -> bool {
        self.entries.contains_key(file_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cached_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        files.sort();
        files
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_store::{InsightCategory, Severity};

    fn insight(path: &str, message: &str) -> Insight {
        Insight::new(path, 1, 0, Severity::Info, InsightCategory::Smell, message)
    }

    #[test]
    fn test_get_unknown_path_is_empty() {
        let cache = InsightCache::new();
        assert!(cache.get("missing.ts").is_empty());
        assert!(!cache.contains("missing.ts"));
    }

    #[test]
    fn test_set_replaces_whole_set() {
        let cache = InsightCache::new();
        cache.set("a.ts", vec![insight("a.ts", "one"), insight("a.ts", "two")]);
        let replacement = vec![insight("a.ts", "three")];

        cache.set("a.ts", replacement.clone());

        assert_eq!(cache.get("a.ts"), replacement);
    }

    #[test]
    fn test_empty_set_is_recorded() {
        let cache = InsightCache::new();
        cache.set("clean.ts", Vec::new());

        assert!(cache.contains("clean.ts"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_and_listing() {
        let cache = InsightCache::new();
        cache.set("b.ts", Vec::new());
        cache.set("a.ts", Vec::new());

        assert_eq!(cache.cached_files(), vec!["a.ts", "b.ts"]);

        cache.clear();
        assert!(cache.is_empty());
    }
}
