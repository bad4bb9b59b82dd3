use crate::models::AudioFeatures;

/// Euclidean norm of an audio-feature vector
#[inline]
pub fn magnitude(features: &AudioFeatures) -> f64 {
    features
        .as_array()
        .iter()
        .map(|c| c * c)
        .sum::<f64>()
        .sqrt()
}

/// Calculate the cosine similarity between two audio-feature vectors
///
/// dot(a, b) / (|a| * |b|)
///
/// # Returns
/// Similarity in [-1, 1]; effectively [0, 1] for non-negative features.
/// Zero when either vector has zero magnitude or a non-finite component.
/// Components outside [0, 1] are used as given.
#[inline]
pub fn cosine_similarity(a: &AudioFeatures, b: &AudioFeatures) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }

    let denominator = magnitude(a) * magnitude(b);
    if denominator == 0.0 {
        return 0.0;
    }

    let dot: f64 = a
        .as_array()
        .iter()
        .zip(b.as_array().iter())
        .map(|(x, y)| x * y)
        .sum();

    dot / denominator
}
