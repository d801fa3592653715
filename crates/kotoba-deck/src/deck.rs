use std::collections::HashSet;

use kotoba_types::VocabularyEntry;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::DeckError;

/// Vocabulary pool for one boss encounter. Entries are immutable after load;
/// draws never repeat an index until the pool is exhausted, at which point
/// the used set is cleared and drawing starts over.
pub struct VocabularyDeck {
    entries: Vec<VocabularyEntry>,
    used: HashSet<usize>,
    rng: ChaCha8Rng,
}

impl VocabularyDeck {
    pub fn new(entries: Vec<VocabularyEntry>, rng: ChaCha8Rng) -> Self {
        Self {
            entries,
            used: HashSet::new(),
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&VocabularyEntry> {
        self.entries.get(index)
    }

    /// Draw `count` distinct unused indices uniformly at random. If fewer
    /// than `count` unused indices remain, the used set is cleared first and
    /// the fresh draw becomes the new used set outright.
    pub fn draw(&mut self, count: usize) -> Result<Vec<usize>, DeckError> {
        if self.entries.len() < count {
            return Err(DeckError::InsufficientVocabulary {
                available: self.entries.len(),
                requested: count,
            });
        }

        if self.entries.len() - self.used.len() < count {
            tracing::debug!(
                used = self.used.len(),
                total = self.entries.len(),
                "deck exhausted, resetting used set"
            );
            self.used.clear();
        }

        let unused: Vec<usize> = (0..self.entries.len())
            .filter(|i| !self.used.contains(i))
            .collect();
        let picked: Vec<usize> = unused
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();

        self.used.extend(picked.iter().copied());
        Ok(picked)
    }

    /// Draw one fresh index to refill a prompt slot after it resolves.
    pub fn replace(&mut self, current: usize) -> Result<usize, DeckError> {
        let fresh = self.draw(1)?[0];
        tracing::trace!(current, fresh, "replaced prompt entry");
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn entry(n: usize) -> VocabularyEntry {
        VocabularyEntry {
            source_text: format!("word {n}"),
            target_text: format!("言葉{n}"),
            transliteration: format!("kotoba{n}"),
        }
    }

    fn deck(size: usize, seed: u64) -> VocabularyDeck {
        let entries = (0..size).map(entry).collect();
        VocabularyDeck::new(entries, ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn draws_are_distinct_until_exhaustion() {
        let mut deck = deck(8, 7);

        let mut seen = HashSet::new();
        for _ in 0..4 {
            for index in deck.draw(2).unwrap() {
                assert!(seen.insert(index), "index {index} repeated before reset");
            }
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn exhausted_draw_resets_used_set() {
        let mut deck = deck(4, 1);

        let first = deck.draw(4).unwrap();
        assert_eq!(first.len(), 4);

        // Second full draw must trigger the reset rule and may repeat
        // entries from the first call.
        let second = deck.draw(4).unwrap();
        assert_eq!(second.len(), 4);
        let distinct: HashSet<usize> = second.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn reset_discards_stale_used_indices() {
        let mut deck = deck(4, 3);

        deck.draw(3).unwrap();
        // 1 unused left, so this draw resets first; the fresh indices become
        // the whole used set, not a union with the stale three.
        let picked = deck.draw(2).unwrap();
        assert_eq!(deck.used.len(), 2);
        assert_eq!(deck.used, picked.into_iter().collect());
    }

    #[test]
    fn replace_picks_the_only_unused_index() {
        let mut deck = deck(5, 11);

        let drawn: HashSet<usize> = deck.draw(4).unwrap().into_iter().collect();
        let remaining = (0..5).find(|i| !drawn.contains(i)).unwrap();
        assert_eq!(deck.replace(drawn.iter().next().copied().unwrap()).unwrap(), remaining);
    }

    #[test]
    fn insufficient_vocabulary_is_fatal() {
        let mut deck = deck(3, 0);
        let err = deck.draw(4).unwrap_err();
        assert!(matches!(
            err,
            DeckError::InsufficientVocabulary {
                available: 3,
                requested: 4
            }
        ));
    }

    #[test]
    fn entries_are_immutable_across_draws() {
        let mut deck = deck(6, 9);
        let before: Vec<VocabularyEntry> = deck.entries.clone();

        deck.draw(4).unwrap();
        deck.replace(0).unwrap();
        deck.draw(6).unwrap();

        assert_eq!(deck.entries, before);
    }
}
