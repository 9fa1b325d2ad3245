//! Derangement generator for gift-exchange draws.
//!
//! A draw maps every participant to exactly one other participant, and every
//! participant is received exactly once. Uniform random permutations are
//! generated and rejected until one has no fixed point; for n >= 2 the
//! acceptance rate stays around 1/e, so the attempt cap is only ever hit when
//! the randomness source is broken.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::{AppError, AppResult};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, Copy)]
pub struct DrawEngine {
    max_attempts: u32,
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl DrawEngine {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Compute a giver -> receiver mapping with no self-assignment.
    ///
    /// Duplicate ids are collapsed. Fails with `InsufficientParticipants` for
    /// fewer than 2 distinct ids (without shuffling) and `DrawExhausted` once
    /// the attempt cap is reached.
    pub fn draw<T>(&self, participant_ids: &[T]) -> AppResult<HashMap<T, T>>
    where
        T: Eq + Hash + Clone,
    {
        self.draw_with_rng(participant_ids, &mut rand::thread_rng())
    }

    fn draw_with_rng<T, R>(&self, participant_ids: &[T], rng: &mut R) -> AppResult<HashMap<T, T>>
    where
        T: Eq + Hash + Clone,
        R: Rng + ?Sized,
    {
        let mut seen = HashSet::with_capacity(participant_ids.len());
        let givers: Vec<T> = participant_ids
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        if givers.len() < 2 {
            return Err(AppError::InsufficientParticipants {
                count: givers.len(),
            });
        }

        let mut receivers = givers.clone();
        for attempt in 1..=self.max_attempts {
            // Fisher-Yates
            receivers.shuffle(rng);

            if givers.iter().zip(&receivers).all(|(g, r)| g != r) {
                log::debug!(
                    "Derangement of {} participants found after {attempt} attempt(s)",
                    givers.len()
                );
                return Ok(givers.into_iter().zip(receivers).collect());
            }
        }

        log::error!(
            "No derangement of {} participants after {} attempts",
            givers.len(),
            self.max_attempts
        );
        Err(AppError::DrawExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// True when `mapping` is a bijection on `ids` with no fixed point
pub fn is_derangement<T: Eq + Hash>(ids: &[T], mapping: &HashMap<T, T>) -> bool {
    let set: HashSet<&T> = ids.iter().collect();
    if mapping.len() != set.len() {
        return false;
    }
    let mut received = HashSet::with_capacity(set.len());
    mapping.iter().all(|(giver, receiver)| {
        giver != receiver
            && set.contains(giver)
            && set.contains(receiver)
            && received.insert(receiver)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_three_participants() {
        let engine = DrawEngine::default();
        let ids = ["P1", "P2", "P3"];
        let result = engine.draw(&ids).unwrap();

        let keys: HashSet<_> = result.keys().copied().collect();
        let values: HashSet<_> = result.values().copied().collect();
        let expected: HashSet<_> = ids.into_iter().collect();
        assert_eq!(keys, expected);
        assert_eq!(values, expected);
        for id in ids {
            assert_ne!(result[id], id);
        }
    }

    #[test]
    fn test_two_participants_always_swap() {
        let engine = DrawEngine::default();
        for _ in 0..200 {
            let result = engine.draw(&["P1", "P2"]).unwrap();
            assert_eq!(result.len(), 2);
            assert_eq!(result["P1"], "P2");
            assert_eq!(result["P2"], "P1");
        }
    }

    #[test]
    fn test_fewer_than_two_fails_without_shuffling() {
        // max_attempts 0 would exhaust immediately; the size check must come first
        let engine = DrawEngine::new(0);
        let empty: [u32; 0] = [];
        assert!(matches!(
            engine.draw(&empty),
            Err(AppError::InsufficientParticipants { count: 0 })
        ));
        assert!(matches!(
            engine.draw(&[7u32]),
            Err(AppError::InsufficientParticipants { count: 1 })
        ));
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let engine = DrawEngine::default();
        assert!(matches!(
            engine.draw(&[1, 1, 1]),
            Err(AppError::InsufficientParticipants { count: 1 })
        ));
        let result = engine.draw(&[1, 2, 2, 3, 1]).unwrap();
        assert!(is_derangement(&[1, 2, 3], &result));
    }

    #[test]
    fn test_attempt_cap_is_respected() {
        let engine = DrawEngine::new(0);
        assert!(matches!(
            engine.draw(&[1, 2, 3]),
            Err(AppError::DrawExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn test_derangement_property_across_sizes() {
        let engine = DrawEngine::default();
        for n in 2..=40u32 {
            let ids: Vec<u32> = (0..n).collect();
            for _ in 0..25 {
                let result = engine.draw(&ids).unwrap();
                assert!(is_derangement(&ids, &result), "n = {n}");
            }
        }
    }

    #[test]
    fn test_seeded_rng_stays_deranged() {
        let engine = DrawEngine::default();
        let mut rng = StdRng::seed_from_u64(0x5EC2E7);
        let ids: Vec<u32> = (0..12).collect();
        for _ in 0..500 {
            let result = engine.draw_with_rng(&ids, &mut rng).unwrap();
            assert!(is_derangement(&ids, &result));
        }
    }

    #[test]
    fn test_every_derangement_of_three_shows_up() {
        // n = 3 has exactly two derangements (the two 3-cycles)
        let engine = DrawEngine::default();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let result = engine.draw(&[0, 1, 2]).unwrap();
            seen.insert((result[&0], result[&1], result[&2]));
        }
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&(1, 2, 0)));
        assert!(seen.contains(&(2, 0, 1)));
    }

    #[test]
    fn test_receivers_spread_roughly_uniformly() {
        // With 4 participants each giver has 3 possible receivers.
        // Over 3000 draws every (giver, receiver) pair should land near 1000.
        let engine = DrawEngine::default();
        let mut counts: HashMap<(u8, u8), u32> = HashMap::new();
        for _ in 0..3000 {
            for (g, r) in engine.draw(&[0u8, 1, 2, 3]).unwrap() {
                *counts.entry((g, r)).or_default() += 1;
            }
        }
        assert_eq!(counts.len(), 12);
        for (pair, count) in counts {
            assert!((700..1300).contains(&count), "{pair:?} -> {count}");
        }
    }

    #[test]
    fn test_is_derangement_rejects_bad_mappings() {
        let ids = [1, 2, 3];
        let fixed: HashMap<_, _> = [(1, 1), (2, 3), (3, 2)].into_iter().collect();
        assert!(!is_derangement(&ids, &fixed));
        let not_bijective: HashMap<_, _> = [(1, 2), (2, 1), (3, 1)].into_iter().collect();
        assert!(!is_derangement(&ids, &not_bijective));
        let missing: HashMap<_, _> = [(1, 2), (2, 1)].into_iter().collect();
        assert!(!is_derangement(&ids, &missing));
        let stranger: HashMap<_, _> = [(1, 2), (2, 9), (3, 1)].into_iter().collect();
        assert!(!is_derangement(&ids, &stranger));
    }
}
