//! Transformation directive strings.
//!
//! Image source URLs carry an optional `tr` query parameter whose value is
//! a comma-separated ordered list of directives (`e-retouch`, `bg-genfill`,
//! `w-<n>`, ...) interpreted by the remote image service. Retouch-style
//! effects accumulate by merging into an existing list; extend-style
//! effects start over from the bare URL so directives do not compound.

const PARAM: &str = "tr";

/// The URL with any query string stripped.
pub fn base_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// The directive list carried by the URL, if any.
pub fn directives(url: &str) -> Option<&str> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == PARAM && !value.is_empty()).then_some(value)
    })
}

/// Builds a URL from a bare base and a directive list.
pub fn with_directives(base: &str, list: &[String]) -> String {
    format!("{}?{}={}", base, PARAM, list.join(","))
}

/// Merges directives into the URL's existing list, or starts a new list on
/// the bare URL when there is none. Existing directives keep their order;
/// incoming ones are appended unless already present, so re-applying an
/// overlapping preset does not stack duplicates.
pub fn merge(url: &str, new: &str) -> String {
    let mut list: Vec<&str> = directives(url).map_or_else(Vec::new, |d| d.split(',').collect());
    for directive in new.split(',') {
        if !list.contains(&directive) {
            list.push(directive);
        }
    }
    format!("{}?{}={}", base_url(url), PARAM, list.join(","))
}

/// Whether the URL carries any of the given directives.
pub fn contains_any(url: &str, needles: &[&str]) -> bool {
    match directives(url) {
        Some(list) => list.split(',').any(|d| needles.contains(&d)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_starts_a_list_on_a_bare_url() {
        assert_eq!(
            merge("https://cdn/x.png", "e-retouch"),
            "https://cdn/x.png?tr=e-retouch"
        );
    }

    #[test]
    fn merge_deduplicates_overlapping_presets() {
        let url = "https://cdn/x.png?tr=e-retouch";
        assert_eq!(
            merge(url, "e-retouch,e-contrast,e-sharpen"),
            "https://cdn/x.png?tr=e-retouch,e-contrast,e-sharpen"
        );
    }

    #[test]
    fn base_url_strips_the_query() {
        assert_eq!(base_url("https://cdn/x.png?tr=bg-genfill,w-10"), "https://cdn/x.png");
        assert_eq!(base_url("https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn contains_any_matches_whole_directives() {
        let url = "https://cdn/x.png?tr=e-bgremove,w-100";
        assert!(contains_any(url, &["e-bgremove"]));
        assert!(!contains_any(url, &["e-bg"]));
        assert!(!contains_any("https://cdn/x.png", &["e-bgremove"]));
    }
}
