//! Filename-safe slugs from commit subjects.

/// Longest slug, in characters.
pub const MAX_SLUG_LEN: usize = 60;

/// Lower-case `subject`, drop everything outside `[a-z0-9\s-]`, collapse
/// whitespace runs to a single hyphen and cut to [`MAX_SLUG_LEN`].
///
/// Leading and trailing hyphens are trimmed after the cut, so the result
/// may be empty for subjects with no usable characters.
pub fn slugify(subject: &str) -> String {
    let mut slug = String::with_capacity(subject.len());
    let mut in_space = false;

    for c in subject.to_lowercase().chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            continue;
        }
        if in_space && !slug.is_empty() {
            slug.push('-');
        }
        in_space = false;
        slug.push(c);
    }

    let cut: String = slug.chars().take(MAX_SLUG_LEN).collect();
    cut.trim_matches('-').to_string()
}
