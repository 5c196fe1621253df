use std::collections::HashSet;

/// Strips trailing `/` and `*` markers from a requested prefix
pub fn normalize_prefix(path: &str) -> &str {
    path.trim_end_matches(['/', '*'])
}

/// First path segment of `path` as a mount, e.g. `/secret/foo/bar` -> `/secret`
pub fn mount_of(path: &str) -> Option<String> {
    normalize_prefix(path)
        .split('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| format!("/{}", segment))
}

/// Removes duplicates, keeping first-seen order
pub fn dedupe<I>(mounts: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    mounts
        .into_iter()
        .filter(|mount| seen.insert(mount.clone()))
        .collect()
}
