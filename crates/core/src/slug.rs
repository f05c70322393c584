//! URL-safe identifiers derived from display names.
//!
//! A slug is lowercase ASCII alphanumerics separated by single hyphens:
//! `^[a-z0-9]+(-[a-z0-9]+)*$`. Uniqueness is not handled here; callers
//! append `-1`, `-2`, ... until the slug is free (see [`with_suffix`]).

/// Slug used when a name has no ASCII alphanumeric characters at all.
pub const FALLBACK_SLUG: &str = "product";

/// Derive a slug from a display name.
///
/// Lowercases, drops every character outside `[a-z0-9]`, whitespace and `-`,
/// then joins the remaining runs with single hyphens. Leading and trailing
/// separators are dropped. The result is empty only when the input contains
/// no ASCII letters or digits.
///
/// ```
/// use velaris_core::slugify;
///
/// assert_eq!(slugify("Aurelia Crescent Sofa"), "aurelia-crescent-sofa");
/// assert_eq!(slugify("  Bianco -- Marble!  "), "bianco-marble");
/// assert_eq!(slugify("!!!"), "");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.trim().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Slug base for a product name, never empty.
#[must_use]
pub fn base_slug(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug
    }
}

/// Candidate slug for the given collision attempt.
///
/// Attempt 0 is the base itself; attempt `n` appends `-n`.
#[must_use]
pub fn with_suffix(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_owned()
    } else {
        format!("{base}-{attempt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_well_formed(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    const SAMPLES: &[&str] = &[
        "Aurelia Sofa",
        "Noir Canopy Bed",
        "  padded   name  ",
        "Ivory / Sanctuary \t Bed",
        "---leading and trailing---",
        "Café Crème Chair",
        "multi\nline\nname",
        "A-B - C",
        "Side table #2 (walnut)",
        "ÉÉÉ",
        "123",
        "",
    ];

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Aurelia Sofa"), "aurelia-sofa");
        assert_eq!(slugify("Monolith Grand Sofa"), "monolith-grand-sofa");
    }

    #[test]
    fn test_slugify_strips_punctuation_without_separating() {
        assert_eq!(slugify("Side table #2 (walnut)"), "side-table-2-walnut");
        assert_eq!(slugify("o'neil"), "oneil");
        assert_eq!(slugify("a.b"), "ab");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("A-B - C"), "a-b-c");
        assert_eq!(slugify("a --  b"), "a-b");
        assert_eq!(slugify("---x---"), "x");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Crème Chair"), "caf-crme-chair");
        assert_eq!(slugify("ÉÉÉ"), "");
    }

    #[test]
    fn test_slugify_output_shape() {
        for sample in SAMPLES {
            let slug = slugify(sample);
            let has_alnum = sample
                .to_lowercase()
                .chars()
                .any(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
            if has_alnum {
                assert!(is_well_formed(&slug), "{sample:?} -> {slug:?}");
            } else {
                assert!(slug.is_empty(), "{sample:?} -> {slug:?}");
            }
        }
    }

    #[test]
    fn test_slugify_idempotent() {
        for sample in SAMPLES {
            let once = slugify(sample);
            assert_eq!(slugify(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_base_slug_fallback() {
        assert_eq!(base_slug("???"), FALLBACK_SLUG);
        assert_eq!(base_slug("Chair"), "chair");
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("aurelia-sofa", 0), "aurelia-sofa");
        assert_eq!(with_suffix("aurelia-sofa", 1), "aurelia-sofa-1");
        assert_eq!(with_suffix("aurelia-sofa", 12), "aurelia-sofa-12");
    }
}
