//! Slug derivation for idea URLs.

use std::collections::HashSet;

/// Fallback when a title has no ASCII alphanumerics at all
const EMPTY_SLUG: &str = "idea";

/// Longest base slug; leaves room for a `-N` suffix within `ideas.slug VARCHAR(255)`
pub const MAX_BASE_SLUG_LEN: usize = 240;

/// Lower-case, hyphen-joined slug of a title.
///
/// ASCII letters and digits are kept, every run of anything else collapses
/// into a single `-`, and hyphens at either end are dropped. The result is
/// cut to `MAX_BASE_SLUG_LEN`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if slug.len() >= MAX_BASE_SLUG_LEN {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                // Never end on a separator
                if slug.len() + 2 > MAX_BASE_SLUG_LEN {
                    break;
                }
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Pick `base` if free, otherwise `base-N` with the smallest unused N >= 2.
///
/// `taken` may contain unrelated slugs that merely share the prefix.
pub fn next_available_slug(base: &str, taken: &[String]) -> String {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();

    if !taken.contains(base) {
        return base.to_string();
    }

    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
