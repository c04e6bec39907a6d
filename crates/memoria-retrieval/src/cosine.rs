use memoria_core::errors::{MemoriaError, MemoriaResult};

/// Cosine similarity `dot(a,b) / (‖a‖·‖b‖)` (spec §4.4). Zero-norm
/// vectors are treated as similarity 0 rather than `NaN`. Mismatched
/// dimensions fail fast — this is a programmer error (spec §7), not a
/// recoverable one, since callers are expected to have already
/// filtered to matching-length embeddings before scoring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> MemoriaResult<f64> {
    if a.len() != b.len() {
        return Err(MemoriaError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_similarity_one() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_are_similarity_minus_one() {
        let v = vec![1.0, 2.0, 3.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        let sim = cosine_similarity(&v, &neg).unwrap();
        assert!((sim - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_are_similarity_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn zero_vector_is_similarity_zero() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn mismatched_dimensions_fail_fast() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, MemoriaError::DimensionMismatch { .. }));
    }

    #[test]
    fn is_symmetric() {
        let a = [0.3, -0.4, 0.8];
        let b = [1.2, 0.1, -0.5];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
    }
}
