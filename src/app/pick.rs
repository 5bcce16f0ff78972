use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform pick over the displayed rows. `None` when nothing is displayed.
pub fn pick_random<R: Rng + ?Sized>(displayed: &[usize], rng: &mut R) -> Option<usize> {
    displayed.choose(rng).copied()
}
