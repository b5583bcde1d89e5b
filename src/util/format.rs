use crate::model::{SubtreeState, Tag};

/// Label for the "Ahead By" column
pub fn ahead_by_label(state: SubtreeState) -> String {
    match state {
        SubtreeState::New => "(new)".to_string(),
        SubtreeState::Diverged => "(diverged)".to_string(),
        SubtreeState::Ahead(n) => n.to_string(),
        SubtreeState::UpToDate => "(up-to-date)".to_string(),
        SubtreeState::Failed => "(failed)".to_string(),
    }
}

/// Sorted, comma-separated tag names, or "(none)"
pub fn tags_label(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "(none)".to_string();
    }
    let mut names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    names.sort_unstable();
    names.join(", ")
}

/// ANSI underline
pub fn underline(text: &str) -> String {
    format!("\x1b[4m{}\x1b[0m", text)
}
