//! Name joins across sources.
//!
//! Records join on (canonical name, position). When no exact key exists a
//! Jaro-Winkler match within the same position is accepted at or above the
//! configured similarity.

use std::collections::HashMap;

use rapidfuzz::distance::jaro_winkler;

use draft_model::{Position, canonical_player_name};

/// How a lookup was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    Fuzzy(f64),
}

/// Lookup of per-player values by name and position.
///
/// Entries without a position only match by exact name.
#[derive(Debug, Clone)]
pub struct NameIndex<T> {
    threshold: f64,
    entries: Vec<(String, Option<Position>, T)>,
    exact: HashMap<(String, Option<Position>), usize>,
}

impl<T> NameIndex<T> {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            entries: Vec::new(),
            exact: HashMap::new(),
        }
    }

    /// Adds an entry. The first entry for a key wins.
    pub fn insert(&mut self, name: &str, position: Option<Position>, value: T) {
        let canonical = canonical_player_name(name);
        let key = (canonical.clone(), position);
        if self.exact.contains_key(&key) {
            return;
        }
        self.exact.insert(key, self.entries.len());
        self.entries.push((canonical, position, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry for a player.
    ///
    /// Exact (name, position) wins, then an exact name with no position, then
    /// the most similar name at the same position. Similarity ties go to the
    /// alphabetically first name.
    pub fn find(&self, name: &str, position: Position) -> Option<(&T, MatchKind)> {
        let canonical = canonical_player_name(name);
        for key in [(canonical.clone(), Some(position)), (canonical.clone(), None)] {
            if let Some(&idx) = self.exact.get(&key) {
                return Some((&self.entries[idx].2, MatchKind::Exact));
            }
        }

        let mut best: Option<(f64, &str, &T)> = None;
        for (candidate, candidate_position, value) in &self.entries {
            if *candidate_position != Some(position) {
                continue;
            }
            let score = jaro_winkler::similarity(canonical.chars(), candidate.chars());
            if score < self.threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_score, best_name, _)) => {
                    score > best_score || (score == best_score && candidate.as_str() < best_name)
                }
            };
            if better {
                best = Some((score, candidate.as_str(), value));
            }
        }
        best.map(|(score, _, value)| (value, MatchKind::Fuzzy(score)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_then_fuzzy_within_position() {
        let mut index = NameIndex::new(0.94);
        index.insert("Shedeur Sanders", Some(Position::Qb), 1);
        index.insert("Jalen Milroe", Some(Position::Qb), 2);
        index.insert("Luther Burden III", Some(Position::Wr), 3);

        assert_eq!(
            index.find("Luther Burden", Position::Wr),
            Some((&3, MatchKind::Exact))
        );
        let (value, kind) = index.find("Shedeur Sandars", Position::Qb).unwrap();
        assert_eq!(*value, 1);
        assert!(matches!(kind, MatchKind::Fuzzy(score) if score >= 0.94));
        assert!(index.find("Shedeur Sandars", Position::Wr).is_none());
        assert!(index.find("Cam Ward", Position::Qb).is_none());
    }

    #[test]
    fn positionless_entries_match_exact_name_only() {
        let mut index = NameIndex::new(0.94);
        index.insert("Mason Graham", None, "combine");
        assert_eq!(
            index.find("Mason Graham", Position::Dt),
            Some((&"combine", MatchKind::Exact))
        );
        assert!(index.find("Mason Grahm", Position::Dt).is_none());
    }

    #[test]
    fn first_insert_wins() {
        let mut index = NameIndex::new(0.94);
        index.insert("Will Johnson", Some(Position::Cb), 1);
        index.insert("Will Johnson", Some(Position::Cb), 2);
        assert_eq!(index.len(), 1);
        assert_eq!(index.find("will johnson", Position::Cb).unwrap().0, &1);
    }
}
