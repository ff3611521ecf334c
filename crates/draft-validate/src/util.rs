//! Utility types for validation.

use std::collections::HashMap;

/// A set that performs case-insensitive lookups but preserves original names.
///
/// Column names in source tables arrive in whatever case the provider used.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveSet {
    /// Maps lowercase name -> original name
    inner: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: impl AsRef<str>) {
        let s = value.as_ref().trim();
        self.inner.insert(s.to_ascii_lowercase(), s.to_string());
    }

    pub fn contains(&self, value: impl AsRef<str>) -> bool {
        self.inner
            .contains_key(&value.as_ref().trim().to_ascii_lowercase())
    }

    /// Original spelling of a value (case-insensitive lookup).
    pub fn get(&self, value: impl AsRef<str>) -> Option<&str> {
        self.inner
            .get(&value.as_ref().trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CaseInsensitiveSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case_and_keep_original() {
        let set: CaseInsensitiveSet = ["W_AV", "Games", "starts"].into_iter().collect();
        assert!(set.contains("w_av"));
        assert!(set.contains(" GAMES "));
        assert_eq!(set.get("STARTS"), Some("starts"));
        assert!(!set.contains("forty"));
        assert_eq!(set.len(), 3);
    }
}
