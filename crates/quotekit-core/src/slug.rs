//! Slug derivation for variable and option identifiers.
//!
//! Formula tokens are derived from display labels once, at design time, and
//! never change afterwards; renaming a variable does not re-slug it. All
//! functions here are pure.

/// Maximum length of a derived slug.
pub const MAX_SLUG_LEN: usize = 30;

/// Derives a machine token from a human label.
///
/// Lowercases, collapses whitespace runs to a single `_`, strips everything
/// outside `[a-z0-9_]`, and truncates to `max_len`. Returns an empty string
/// when nothing survives; callers fall back to an indexed id.
pub fn slugify(label: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(label.len().min(max_len));
    let mut pending_sep = false;
    for ch in label.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = !out.is_empty();
            continue;
        }
        for lower in ch.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() || lower == '_' {
                if pending_sep {
                    out.push('_');
                    pending_sep = false;
                }
                out.push(lower);
            }
        }
    }
    out.truncate(max_len);
    out
}

/// Variable id for a label, falling back to `variable_{index}` when the
/// label slugs to nothing.
pub fn variable_slug(label: &str, index: usize) -> String {
    let slug = slugify(label, MAX_SLUG_LEN);
    if slug.is_empty() {
        format!("variable_{index}")
    } else {
        slug
    }
}

/// Option id for a label, falling back to `option_{index}`.
pub fn option_slug(label: &str, index: usize) -> String {
    let slug = slugify(label, MAX_SLUG_LEN);
    if slug.is_empty() {
        format!("option_{index}")
    } else {
        slug
    }
}

/// Disambiguates `candidate` against already-taken sibling ids by appending
/// `_2`, `_3`, ... until unique.
pub fn unique_slug(candidate: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == candidate) {
        return candidate.to_string();
    }
    let mut n: u32 = 2;
    loop {
        let suffixed = format!("{candidate}_{n}");
        if !taken.iter().any(|t| t == &suffixed) {
            return suffixed;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_labels() {
        insta::assert_snapshot!(slugify("Square Footage", MAX_SLUG_LEN), @"square_footage");
        insta::assert_snapshot!(slugify("  Has   Garage? ", MAX_SLUG_LEN), @"has_garage");
        insta::assert_snapshot!(slugify("Price (per m2)", MAX_SLUG_LEN), @"price_per_m2");
    }

    #[test]
    fn strips_everything_else() {
        assert_eq!(slugify("C++ & Rust!", MAX_SLUG_LEN), "c_rust");
        assert_eq!(slugify("100% wool", MAX_SLUG_LEN), "100_wool");
    }

    #[test]
    fn truncates() {
        let long = "a".repeat(50);
        assert_eq!(slugify(&long, MAX_SLUG_LEN).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn empty_label_falls_back_to_index() {
        assert_eq!(variable_slug("!!!", 3), "variable_3");
        assert_eq!(option_slug("", 0), "option_0");
        assert_eq!(variable_slug("Width", 3), "width");
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let taken = vec!["size".to_string(), "size_2".to_string()];
        assert_eq!(unique_slug("size", &taken), "size_3");
        assert_eq!(unique_slug("color", &taken), "color");
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            slugify("Deck Size (sq ft)", MAX_SLUG_LEN),
            slugify("Deck Size (sq ft)", MAX_SLUG_LEN)
        );
    }
}
