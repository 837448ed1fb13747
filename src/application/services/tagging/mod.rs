use std::collections::HashSet;

/// Trims every name, drops empties and removes exact duplicates, keeping the
/// first occurrence. Comparison is case-sensitive.
pub fn normalize_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let t = name.as_ref().trim();
        if t.is_empty() {
            continue;
        }
        if seen.insert(t.to_string()) {
            out.push(t.to_string());
        }
    }
    out
}

/// Splits a comma separated tag list, e.g. `"yoga, crossfit"`.
pub fn split_tag_list(raw: &str) -> Vec<String> {
    normalize_tag_names(raw.split(','))
}
