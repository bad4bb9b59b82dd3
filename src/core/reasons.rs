/// How many shared items a reason sentence names
pub const MAX_EXAMPLES: usize = 2;

pub const AUDIO_REASON: &str = "Your music has a similar emotional vibe";

/// Build the human-readable reasons for a match
///
/// One sentence per non-empty category, always in the order artists,
/// genres, tracks, audio.
pub fn compatibility_reasons(
    shared_artists: &[String],
    shared_genres: &[String],
    shared_tracks: &[String],
    audio_score: f64,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(4);

    if !shared_artists.is_empty() {
        reasons.push(format!("You both love {}", examples(shared_artists)));
    }
    if !shared_genres.is_empty() {
        reasons.push(format!("You're both into {}", examples(shared_genres)));
    }
    if !shared_tracks.is_empty() {
        reasons.push(format!("You both have {} on repeat", examples(shared_tracks)));
    }
    if audio_score > 0.0 {
        reasons.push(AUDIO_REASON.to_string());
    }

    reasons
}

#[inline]
fn examples(items: &[String]) -> String {
    items
        .iter()
        .take(MAX_EXAMPLES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
