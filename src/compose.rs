// src/compose.rs

use rand::seq::SliceRandom;

use crate::error::AppError;

/// Draws `count` distinct question ids from the candidate pool, uniformly
/// shuffled (Fisher-Yates). Fails with a 400 when the pool is too small;
/// nothing is retried or padded.
pub fn draw_random(mut candidates: Vec<i64>, count: usize) -> Result<Vec<i64>, AppError> {
    if candidates.len() < count {
        return Err(AppError::BadRequest(format!(
            "Not enough questions available: requested {}, found {}",
            count,
            candidates.len()
        )));
    }

    let mut rng = rand::thread_rng();
    candidates.shuffle(&mut rng);
    candidates.truncate(count);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn draws_exactly_n_distinct_ids_from_the_pool() {
        let pool: Vec<i64> = (1..=20).collect();
        let drawn = draw_random(pool.clone(), 5).unwrap();
        assert_eq!(drawn.len(), 5);

        let unique: HashSet<i64> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert!(drawn.iter().all(|id| pool.contains(id)));
    }

    #[test]
    fn full_pool_draw_is_a_permutation() {
        let pool: Vec<i64> = (1..=10).collect();
        let mut drawn = draw_random(pool.clone(), 10).unwrap();
        drawn.sort_unstable();
        assert_eq!(drawn, pool);
    }

    #[test]
    fn insufficient_pool_is_rejected() {
        let result = draw_random(vec![1, 2, 3], 4);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
