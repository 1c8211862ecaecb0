const PROFANE: &[&str] = &["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Mask profane words. Whitespace runs collapse to single spaces; matching is
/// on whole whitespace-separated words, case-insensitive, so punctuation
/// attached to a word prevents a match.
pub fn clean_body(body: &str) -> String {
    body.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE.contains(&lower.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
