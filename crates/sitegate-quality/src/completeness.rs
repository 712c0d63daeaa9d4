//! Structural completeness: index presence and expected pages

use sitegate_core::workspace::INDEX_FILES;
use sitegate_core::Completeness;

/// Where an expected page should live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    /// "Home" is served by the root index file
    Index,
    /// Slugified page name, e.g. "About Us" → "about-us"
    Slug(String),
}

/// Lower-case, collapse each run of non-alphanumerics into `-`, trim `-`.
pub fn page_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

pub fn page_target(name: &str) -> PageTarget {
    if name.trim().eq_ignore_ascii_case("home") {
        PageTarget::Index
    } else {
        PageTarget::Slug(page_slug(name))
    }
}

/// Whether any markup path satisfies `slug`, ignoring case.
fn has_page(markup_paths: &[String], slug: &str) -> bool {
    if slug.is_empty() {
        return false;
    }
    let candidates = [
        format!("{slug}.html"),
        format!("{slug}.htm"),
        format!("{slug}/index.html"),
        format!("{slug}/index.htm"),
    ];
    markup_paths.iter().any(|path| {
        let path = path.to_ascii_lowercase();
        let file_name = path.rsplit('/').next().unwrap_or(&path);
        candidates
            .iter()
            .any(|c| path == *c || path.ends_with(&format!("/{c}")) || file_name == c)
    })
}

pub fn has_root_index(markup_paths: &[String]) -> bool {
    markup_paths
        .iter()
        .any(|path| INDEX_FILES.iter().any(|index| path.eq_ignore_ascii_case(index)))
}

/// Build the completeness block. `markup_paths` are workspace-relative
/// markup files; `total_files` excludes pipeline metadata.
pub fn check_completeness(
    markup_paths: &[String],
    total_files: usize,
    expected_pages: &[String],
) -> Completeness {
    let missing_pages = expected_pages
        .iter()
        .filter(|page| match page_target(page) {
            PageTarget::Index => false,
            PageTarget::Slug(slug) => !has_page(markup_paths, &slug),
        })
        .cloned()
        .collect();

    Completeness {
        has_index: has_root_index(markup_paths),
        missing_pages,
        total_files,
        html_file_count: markup_paths.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_page_slug() {
        assert_eq!(page_slug("Pricing"), "pricing");
        assert_eq!(page_slug("About Us"), "about-us");
        assert_eq!(page_slug("  FAQ & Help! "), "faq-help");
        assert_eq!(page_slug("Terms/Privacy"), "terms-privacy");
    }

    #[test]
    fn test_home_maps_to_index() {
        assert_eq!(page_target("Home"), PageTarget::Index);
        assert_eq!(page_target(" home "), PageTarget::Index);
        assert_eq!(page_target("Homepage"), PageTarget::Slug("homepage".to_string()));
    }

    #[test]
    fn test_missing_pages_keep_caller_names() {
        let markup = paths(&["index.html", "about-us.html"]);
        let expected = paths(&["Home", "About Us", "Pricing"]);
        let completeness = check_completeness(&markup, 3, &expected);

        assert!(completeness.has_index);
        assert_eq!(completeness.missing_pages, vec!["Pricing"]);
        assert_eq!(completeness.html_file_count, 2);
        assert_eq!(completeness.total_files, 3);
    }

    #[test]
    fn test_pages_match_case_insensitively_and_in_folders() {
        let markup = paths(&["INDEX.HTML", "Pricing.HTML", "blog/index.html", "pages/contact.htm"]);
        let expected = paths(&["Pricing", "Blog", "Contact"]);
        let completeness = check_completeness(&markup, 4, &expected);

        assert!(completeness.has_index);
        assert!(completeness.missing_pages.is_empty());
    }

    #[test]
    fn test_nested_index_is_not_root_index() {
        let markup = paths(&["blog/index.html"]);
        assert!(!has_root_index(&markup));
    }
}
