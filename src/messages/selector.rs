/// Weighted selector: draws one template from a pool for a condition.
///
///   1. keep entries whose predicate is absent or holds (predicate errors propagate)
///   2. effective weight = weight, or weight / 10 if the text was announced recently
///   3. draw r uniformly from [0, total], upper bound included
///   4. walk the candidates in pool order; the first range containing r wins
///   5. remember the winner in the recency tracker
///
/// Effective weights are kept in tenths (fresh = weight × 10, repeated =
/// weight) so the repetition penalty stays exact in integers.
///
/// The inclusive draw lets r equal `total`, which falls past every range.
/// That draw resolves to the first candidate, which gets a slight bias.
use super::{
    condition::Condition,
    pool::{TemplateEntry, TemplatePool},
    recency::{RecencyTracker, RecentHistory},
    MessageError, Result,
};
use rand::Rng;
use std::sync::Arc;

const REPEAT_PENALTY: u64 = 10;

#[derive(Debug, Clone)]
pub struct Selector {
    recent: Arc<RecencyTracker>,
}

impl Selector {
    pub fn new(recent: Arc<RecencyTracker>) -> Self {
        Self { recent }
    }

    pub fn recent(&self) -> &RecencyTracker {
        &self.recent
    }

    /// Returns the winning raw template; formatting is the caller's job.
    pub fn select<R: Rng + ?Sized>(
        &self,
        pool:      &TemplatePool,
        condition: &Condition,
        rng:       &mut R,
    ) -> Result<&'static str> {
        // Held until the winner is pushed: check, draw and update are one step.
        let mut history = self.recent.lock();

        let mut candidates: Vec<&TemplateEntry> = Vec::with_capacity(pool.len());
        let mut weights:    Vec<u64>            = Vec::with_capacity(pool.len());
        for entry in pool.entries() {
            if !entry.applies_to(condition)? {
                continue;
            }
            weights.push(effective_weight(entry, &history));
            candidates.push(entry);
        }

        if candidates.is_empty() {
            return Err(MessageError::NoCandidates { pool: pool.name().to_owned(), kind: condition.kind() });
        }

        let total: u64 = weights.iter().sum();
        let roll       = rng.gen_range(0..=total);
        let index      = winner_index(&weights, roll);
        let winner     = candidates[index].text;

        tracing::debug!(
            "Selected entry {}/{} from '{}' (roll {} of {})",
            index + 1,
            candidates.len(),
            pool.name(),
            roll,
            total
        );

        history.push(winner);
        Ok(winner)
    }
}

/// Effective weight in tenths.
fn effective_weight(entry: &TemplateEntry, history: &RecentHistory) -> u64 {
    let weight = u64::from(entry.weight);
    if history.contains(entry.text) {
        weight
    } else {
        weight * REPEAT_PENALTY
    }
}

/// Index of the first cumulative range `[pos, pos + w)` containing `roll`.
/// A roll past every range (only `roll == total`) maps to the first candidate.
fn winner_index(weights: &[u64], roll: u64) -> usize {
    let mut pos = 0;
    for (i, w) in weights.iter().enumerate() {
        if roll < pos + w {
            return i;
        }
        pos += w;
    }
    0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{
        condition::tests::{knight, monster},
        pool::TemplateEntry,
        recency::DEFAULT_CAPACITY,
        tables,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn selector() -> Selector {
        Selector::new(Arc::new(RecencyTracker::default()))
    }

    fn level_up(level: u32) -> Condition {
        Condition::level_up(knight(level), 30, level).unwrap()
    }

    #[test]
    fn boundary_draw_goes_to_first_candidate() {
        let weights = [1000, 100, 500];
        assert_eq!(winner_index(&weights, 0), 0);
        assert_eq!(winner_index(&weights, 999), 0);
        assert_eq!(winner_index(&weights, 1000), 1);
        assert_eq!(winner_index(&weights, 1099), 1);
        assert_eq!(winner_index(&weights, 1100), 2);
        assert_eq!(winner_index(&weights, 1600), 0);
    }

    #[test]
    fn single_candidate_always_wins() {
        let pool = TemplatePool::new(
            "single",
            vec![
                TemplateEntry::always(5, "only one"),
                TemplateEntry::when(100, "never", |_| Ok(false)),
            ],
        )
        .unwrap();
        let sel = selector();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(sel.select(&pool, &level_up(50), &mut rng).unwrap(), "only one");
        }
    }

    #[test]
    fn winner_is_remembered() {
        let pool = TemplatePool::new("one", vec![TemplateEntry::always(1, "hello")]).unwrap();
        let sel = selector();
        sel.select(&pool, &level_up(50), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(sel.recent().snapshot(), vec!["hello"]);
    }

    #[test]
    fn recently_used_template_is_penalized_not_excluded() {
        let pool = TemplatePool::new(
            "pair",
            vec![TemplateEntry::always(100, "T"), TemplateEntry::always(100, "U")],
        )
        .unwrap();
        let sel = selector();
        let mut rng = StdRng::seed_from_u64(42);
        let (mut t, mut u) = (0u32, 0u32);
        for _ in 0..10_000 {
            sel.recent().clear();
            sel.recent().push("T");
            match sel.select(&pool, &level_up(50), &mut rng).unwrap() {
                "T" => t += 1,
                _   => u += 1,
            }
        }
        assert!(u > t, "U={} T={}", u, t);
        assert!(t > 0, "penalty must not exclude T");
        // 1000 / 1101 expected for U
        assert!(u > 8_800 && u < 9_350, "U={}", u);
    }

    #[test]
    fn concurrent_selections_keep_history_consistent() {
        let pool: &'static TemplatePool = &tables::LEVEL_MESSAGES;
        for (threads, per_thread) in [(4u64, 5usize), (8, 40)] {
            let sel = selector();
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let sel = sel.clone();
                    std::thread::spawn(move || {
                        let mut rng = StdRng::seed_from_u64(t);
                        let c = level_up(120);
                        for _ in 0..per_thread {
                            sel.select(pool, &c, &mut rng).unwrap();
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }

            let history = sel.recent().snapshot();
            let total   = threads as usize * per_thread;
            assert_eq!(history.len(), total.min(DEFAULT_CAPACITY));
            assert!(history.iter().all(|text| pool.entries().iter().any(|e| e.text == text.as_str())));
        }
    }

    #[test]
    fn predicate_error_propagates() {
        let pool = TemplatePool::new(
            "broken",
            vec![
                TemplateEntry::always(1, "fallback"),
                TemplateEntry::when(1, "death only", |c| {
                    Ok(crate::messages::condition::levels_lost(c)? > 0)
                }),
            ],
        )
        .unwrap();
        let err = selector().select(&pool, &level_up(50), &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(err, MessageError::MissingField { field: "levels_lost", .. }));
    }

    #[test]
    fn builtin_pools_never_fail_for_valid_conditions() {
        let sel = selector();
        let mut rng = StdRng::seed_from_u64(9);
        for level in [1, 8, 35, 45, 80, 100, 130, 250, 731] {
            let c = level_up(level);
            assert!(sel.select(tables::pool_for(&c), &c, &mut rng).is_ok());
            let d = Condition::death(knight(level), 30, level, 1, &[monster("a dragon")]).unwrap();
            assert!(sel.select(tables::pool_for(&d), &d, &mut rng).is_ok());
        }
    }

    #[test]
    fn level_specific_entry_dominates_knight_thirty_five() {
        let pool = &*tables::LEVEL_MESSAGES;
        let c = level_up(35);
        let applicable: u64 = pool
            .entries()
            .iter()
            .filter(|e| e.applies_to(&c).unwrap())
            .map(|e| u64::from(e.weight))
            .sum();
        let expected = 20_000.0 / applicable as f64;

        let sel = selector();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut hits = 0;
        for _ in 0..1_000 {
            sel.recent().clear();
            if sel.select(pool, &c, &mut rng).unwrap().contains("berserk") {
                hits += 1;
            }
        }
        let observed = hits as f64 / 1_000.0;
        assert!((observed - expected).abs() < 0.03, "observed {} expected {}", observed, expected);
    }
}
