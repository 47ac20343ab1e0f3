use bitvec::prelude::*;
use rand::Rng;

use crate::corpus::LabeledSentence;

/// Draw `min(k, pool.len())` distinct sentences uniformly at random.
///
/// Indices are drawn with replacement and rejected when already taken, so
/// asking for the whole pool yields a permutation of it.
pub fn sample<'p, R: Rng + ?Sized>(
    pool: &'p [LabeledSentence],
    k: usize,
    rng: &mut R,
) -> Vec<&'p LabeledSentence> {
    let target = k.min(pool.len());
    let mut chosen = bitvec![0; pool.len()];
    let mut picked = Vec::with_capacity(target);

    while picked.len() < target {
        let idx = rng.gen_range(0..pool.len());
        if chosen[idx] {
            continue;
        }
        chosen.set(idx, true);
        picked.push(&pool[idx]);
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(n: usize) -> Vec<LabeledSentence> {
        (0..n)
            .map(|i| LabeledSentence::new(&format!("sentence {i}"), "bank", &format!("bank%1:17:{i:02}::")))
            .collect()
    }

    fn is_distinct(picked: &[&LabeledSentence]) -> bool {
        picked
            .iter()
            .enumerate()
            .all(|(i, a)| picked[i + 1..].iter().all(|b| !std::ptr::eq(*a, *b)))
    }

    #[test]
    fn sample_size_is_min_of_pool_and_request() {
        let pool = pool(10);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample(&pool, 3, &mut rng).len(), 3);
        assert_eq!(sample(&pool, 10, &mut rng).len(), 10);
        assert_eq!(sample(&pool, 50, &mut rng).len(), 10);
        assert!(sample(&pool, 0, &mut rng).is_empty());
    }

    #[test]
    fn no_duplicates_and_drawn_from_pool() {
        let pool = pool(25);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sample(&pool, 12, &mut rng);
            assert!(is_distinct(&picked));
            assert!(picked.iter().all(|s| pool.iter().any(|p| std::ptr::eq(p, *s))));
        }
    }

    #[test]
    fn whole_pool_is_a_permutation() {
        let pool = pool(8);
        let mut rng = StdRng::seed_from_u64(42);
        let picked = sample(&pool, 8, &mut rng);
        assert!(is_distinct(&picked));
        for sentence in &pool {
            assert!(picked.iter().any(|p| std::ptr::eq(*p, sentence)));
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let pool = pool(30);
        let a = sample(&pool, 5, &mut StdRng::seed_from_u64(1));
        let b = sample(&pool, 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_pool_gives_empty_sample() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(sample(&[], 50, &mut rng).is_empty());
    }
}
