//! Mandatory hashtag enforcement.
//!
//! Every published offer must carry both store hashtags. The model is asked to
//! add them itself; when it forgets, the full tag line is appended here.

/// Tags every offer text must end up containing.
pub const MANDATORY_HASHTAGS: [&str; 2] = ["#superbrugsenjels", "#jatak"];

/// Mandatory tags first, then the model's extras, without repeats.
/// Comparison is case-sensitive; the first occurrence wins.
pub fn merge_hashtags(extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(MANDATORY_HASHTAGS.len() + extra.len());
    let candidates = MANDATORY_HASHTAGS
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str));
    for tag in candidates {
        if !merged.iter().any(|t| t == tag) {
            merged.push(tag.to_string());
        }
    }
    merged
}

/// Whether `text` already mentions every mandatory tag, ignoring case.
pub fn has_mandatory_hashtags(text: &str) -> bool {
    let lower = text.to_lowercase();
    MANDATORY_HASHTAGS
        .iter()
        .all(|tag| lower.contains(&tag.to_lowercase()))
}

/// Returns the trimmed body, with the merged tag line appended as its own
/// paragraph unless both mandatory tags are already present.
pub fn enforce_hashtags(body: &str, extra: &[String]) -> String {
    let text = body.trim();
    if has_mandatory_hashtags(text) {
        return text.to_string();
    }
    let tag_line = merge_hashtags(extra).join(" ");
    format!("{text}\n\n{tag_line}").trim().to_string()
}
