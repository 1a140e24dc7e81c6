//! Slug derivation

/// Slug used when a name has no ASCII alphanumerics.
pub const FALLBACK_SLUG: &str = "item";

/// Lowercase ASCII alphanumerics, every other run collapsed into one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// The `attempt`-th candidate for `base`: `base`, `base-2`, `base-3`, ...
pub fn candidate(base: &str, attempt: usize) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}
