//! Uniform draw strategies for refilling the look-ahead window
//!
//! The queue draws keys, not tracks: the pool stays keyed by track key and
//! the draw only decides *which* keys leave it next.

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Draw up to `count` keys uniformly, without replacement
///
/// Bounded Fisher-Yates via [`SliceRandom::partial_shuffle`]: only `count`
/// positions are shuffled, so a large pool pays for the draw rather than a
/// full shuffle. Each drawn key is uniformly likely among the keys still
/// undrawn at the time of its draw.
pub(crate) fn draw_keys(mut keys: Vec<u64>, count: usize) -> Vec<u64> {
    let mut rng = thread_rng();
    let count = count.min(keys.len());
    let (drawn, _) = keys.partial_shuffle(&mut rng, count);
    drawn.to_vec()
}

/// Pick a single key uniformly
pub(crate) fn pick_key(keys: &[u64]) -> Option<u64> {
    keys.choose(&mut thread_rng()).copied()
}
