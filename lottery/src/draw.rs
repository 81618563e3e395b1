use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one candidate uniformly at random.
///
/// Returns `None` when the slice is empty. Each call is an independent draw;
/// the caller owns the rng so tests can seed it.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, candidates: &'a [T]) -> Option<&'a T> {
    candidates.choose(rng)
}
