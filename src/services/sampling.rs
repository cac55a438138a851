use rand::{seq::SliceRandom, Rng};

use crate::models::domain::Question;

/// Shuffles the whole pool uniformly and keeps the first `requested`
/// questions, or all of them when the pool is smaller.
pub fn sample_questions<R>(mut pool: Vec<Question>, requested: usize, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    pool.shuffle(rng);
    pool.truncate(requested);
    pool
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::test_utils::fixtures::question_pool;

    #[test]
    fn sample_never_exceeds_requested() {
        let mut rng = StdRng::seed_from_u64(1);
        let sample = sample_questions(question_pool("Python", 30), 10, &mut rng);

        assert_eq!(sample.len(), 10);
    }

    #[test]
    fn small_pool_is_served_whole() {
        let mut rng = StdRng::seed_from_u64(1);
        let sample = sample_questions(question_pool("Python", 3), 5, &mut rng);

        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn sample_draws_without_replacement() {
        let mut rng = StdRng::seed_from_u64(99);
        let sample = sample_questions(question_pool("Go", 50), 20, &mut rng);

        let ids: HashSet<_> = sample.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids.len(), 20);
        assert!(sample.iter().all(|q| q.language == "Go"));
    }

    #[test]
    fn same_seed_gives_same_sample() {
        let first = sample_questions(question_pool("Rust", 20), 5, &mut StdRng::seed_from_u64(42));
        let second = sample_questions(question_pool("Rust", 20), 5, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_draws_differ() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = sample_questions(question_pool("Rust", 40), 10, &mut rng);
        let second = sample_questions(question_pool("Rust", 40), 10, &mut rng);

        assert_ne!(first, second);
    }

    #[test]
    fn every_question_can_come_first() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut leaders = HashSet::new();
        for _ in 0..200 {
            let sample = sample_questions(question_pool("Kotlin", 4), 4, &mut rng);
            leaders.insert(sample[0].id.clone());
        }

        assert_eq!(leaders.len(), 4);
    }
}
