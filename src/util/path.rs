/// Normalizes a subtree prefix: surrounding whitespace, a leading `./` and
/// trailing separators are dropped.
///
/// Git subtree prefixes always use `/`, regardless of platform.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    trimmed.trim_end_matches('/').to_string()
}

/// Final path segment of a normalized prefix.
pub fn basename(prefix: &str) -> &str {
    prefix.rsplit('/').next().unwrap_or(prefix)
}

/// The last two segments joined as `owner/name`, if the prefix has at least two.
pub fn last_two_segments(prefix: &str) -> Option<String> {
    let mut parts = prefix.rsplit('/').filter(|p| !p.is_empty());
    let name = parts.next()?;
    let owner = parts.next()?;
    Some(format!("{}/{}", owner, name))
}
