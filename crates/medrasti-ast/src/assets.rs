//! Binary resources referenced by a document

use std::collections::BTreeMap;

/// Image bytes keyed by the `src` of the block that references them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets {
    entries: BTreeMap<String, Vec<u8>>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(src.into(), bytes);
    }

    pub fn get(&self, src: &str) -> Option<&[u8]> {
        self.entries.get(src).map(Vec::as_slice)
    }

    pub fn contains(&self, src: &str) -> bool {
        self.entries.contains_key(src)
    }

    /// Entries in `src` order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(src, bytes)| (src.as_str(), bytes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_source() {
        let mut assets = Assets::new();
        assert!(assets.is_empty());
        assets.insert("logo.png", vec![1, 2, 3]);
        assert_eq!(assets.get("logo.png"), Some(&[1u8, 2, 3][..]));
        assert!(assets.get("other.png").is_none());
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn test_iter_is_sorted_by_source() {
        let mut assets = Assets::new();
        assets.insert("b.png", vec![2]);
        assets.insert("a.png", vec![1]);
        let srcs: Vec<&str> = assets.iter().map(|(src, _)| src).collect();
        assert_eq!(srcs, ["a.png", "b.png"]);
    }
}
