use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::db::Question;

/// Picks a question uniformly at random among `candidates` that were not asked yet.
/// `None` means every candidate has been played.
pub fn select_next<'a, R: Rng + ?Sized>(
    candidates: &'a [Question],
    previous: &[i64],
    rng: &mut R,
) -> Option<&'a Question> {
    let asked: HashSet<i64> = previous.iter().copied().collect();
    candidates
        .iter()
        .filter(|question| !asked.contains(&question.id))
        .choose(rng)
}
