use std::collections::HashSet;
use std::hash::Hash;

/// Set of keys already emitted, for at-most-once output
#[derive(Debug, Clone)]
pub struct SeenKeys<K> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> SeenKeys<K> {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Record `key`, returning `true` the first time it is seen
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<K: Eq + Hash> Default for SeenKeys<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_wins() {
        let mut seen = SeenKeys::new();
        assert!(seen.insert("a"));
        assert!(!seen.insert("a"));
        assert!(seen.insert("b"));
        assert_eq!(seen.len(), 2);

        seen.clear();
        assert!(seen.is_empty());
        assert!(seen.insert("a"));
    }
}
