use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Deterministic fallback vector seeded by a content hash (spec §4.3):
/// same text always yields the same vector, so re-embedding later is
/// the only way to get a semantically meaningful one, but callers in
/// the meantime see stable, reproducible behavior rather than noise
/// that changes on every retry.
pub fn fallback_vector(text: &str, dimensions: usize) -> Vec<f32> {
    let seed: [u8; 32] = *blake3::hash(text.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);
    (0..dimensions).map(|_| rng.gen_range(-1.0f32..=1.0)).collect()
}
