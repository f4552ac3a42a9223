//! Structural extraction and field normalization
//!
//! Source pages are mined by label-anchored rules rather than positional
//! indices: page generators reliably keep the label→value structural pairing
//! ("Genre:" followed by its value element) even when surrounding layout
//! changes. Each rule names the label text, the traversal from the label to
//! its value, and leaves type-specific normalization to the caller, so the
//! extraction logic stays data-driven and testable without any fetching.

use scraper::{ElementRef, Selector};

/// How to reach a field's value element starting from its label element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Full text of the element following the label
    NextText,
    /// Text of each anchor under the element following the label
    NextAnchorTexts,
    /// href of the first anchor under the element following the label
    NextAnchorHref,
    /// src of each image under the element following the label
    NextImageSrcs,
}

/// One declarative extraction rule: a label anchor plus a traversal
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<'a> {
    /// Selector for candidate label elements (e.g. "p", "h2")
    pub label_selector: &'a str,
    /// Exact trimmed text the label element must carry
    pub label: &'a str,
    pub relation: Traversal,
}

/// Applies a field rule within a scope, returning raw trimmed strings
///
/// Zero matches is not an error: an absent label, an absent value element,
/// or an empty value all yield an empty vector, and the caller decides
/// whether the field was mandatory. Multi-valued traversals preserve
/// document order.
pub fn extract_field(scope: ElementRef<'_>, rule: &FieldRule<'_>) -> Vec<String> {
    let label_el = match element_with_text(scope, rule.label_selector, rule.label) {
        Some(el) => el,
        None => return Vec::new(),
    };
    let value_el = match next_element(label_el) {
        Some(el) => el,
        None => return Vec::new(),
    };

    match rule.relation {
        Traversal::NextText => {
            let text = value_el.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text.to_string()]
            }
        }
        Traversal::NextAnchorTexts => texts_of(value_el, "a"),
        Traversal::NextAnchorHref => attrs_of(value_el, "a", "href").into_iter().take(1).collect(),
        Traversal::NextImageSrcs => attrs_of(value_el, "img", "src"),
    }
}

/// Finds the first element matching `selector` whose trimmed text equals
/// `label`
pub fn element_with_text<'a>(
    scope: ElementRef<'a>,
    selector: &str,
    label: &str,
) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    scope
        .select(&sel)
        .find(|el| el.text().collect::<String>().trim() == label)
}

/// Returns the next sibling that is an element, skipping text nodes
pub fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Returns the first element matching `selector` within the scope
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    scope.select(&sel).next()
}

/// Collects the trimmed text of every element matching `selector`,
/// in document order, skipping empties
pub fn texts_of(scope: ElementRef<'_>, selector: &str) -> Vec<String> {
    let sel = match Selector::parse(selector) {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    scope
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Collects an attribute from every element matching `selector`,
/// in document order
pub fn attrs_of(scope: ElementRef<'_>, selector: &str, attr: &str) -> Vec<String> {
    let sel = match Selector::parse(selector) {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    scope
        .select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Concatenates the text nodes that are direct children of the element,
/// ignoring text nested in child elements
///
/// Used for markup like `<h1><span>CODE</span>Actual Title</h1>` where the
/// wanted value is the tail after the span.
pub fn direct_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
    out.trim().to_string()
}

/// Strips the query string from a URL, keeping scheme, host and path
///
/// Sources append cache-busting/signing suffixes to image URLs; stripping
/// them makes the same image compare equal across fetches. Idempotent: an
/// already-stripped URL comes back unchanged.
pub fn strip_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// Removes all whitespace from a name so the same person compares equal
/// across sources that space names differently
pub fn clean_name(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Extracts the first contiguous digit run from free text
/// (e.g. "Runtime: 95 min" → 95); `None` if the text has no digits
pub fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const LABELED_PAGE: &str = r#"
        <html><body><section id="detail">
            <h1><span>ABP-647</span>Sample Title</h1>
            <p>Genre:</p>
            <div><a href="/g/1">Drama</a><a href="/g/2">Thriller</a></div>
            <p>Runtime:</p>
            <p>95 min</p>
            <p>Released:</p>
            <div><a href="/list?date=2019-07-19">2019-07-19</a></div>
            <h2>Samples</h2>
            <div>
                <img src="https://x/p1.jpg?sig=a">
                <img src="https://x/p2.jpg?sig=b">
            </div>
        </section></body></html>"#;

    #[test]
    fn test_anchor_texts_preserve_order() {
        let doc = Html::parse_document(LABELED_PAGE);
        let rule = FieldRule {
            label_selector: "p",
            label: "Genre:",
            relation: Traversal::NextAnchorTexts,
        };
        let genres = extract_field(doc.root_element(), &rule);
        assert_eq!(genres, vec!["Drama", "Thriller"]);
    }

    #[test]
    fn test_next_text_traversal() {
        let doc = Html::parse_document(LABELED_PAGE);
        let rule = FieldRule {
            label_selector: "p",
            label: "Runtime:",
            relation: Traversal::NextText,
        };
        assert_eq!(extract_field(doc.root_element(), &rule), vec!["95 min"]);
    }

    #[test]
    fn test_anchor_href_traversal() {
        let doc = Html::parse_document(LABELED_PAGE);
        let rule = FieldRule {
            label_selector: "p",
            label: "Released:",
            relation: Traversal::NextAnchorHref,
        };
        assert_eq!(
            extract_field(doc.root_element(), &rule),
            vec!["/list?date=2019-07-19"]
        );
    }

    #[test]
    fn test_image_srcs_traversal() {
        let doc = Html::parse_document(LABELED_PAGE);
        let rule = FieldRule {
            label_selector: "h2",
            label: "Samples",
            relation: Traversal::NextImageSrcs,
        };
        assert_eq!(
            extract_field(doc.root_element(), &rule),
            vec!["https://x/p1.jpg?sig=a", "https://x/p2.jpg?sig=b"]
        );
    }

    #[test]
    fn test_missing_label_yields_empty() {
        let doc = Html::parse_document(LABELED_PAGE);
        let rule = FieldRule {
            label_selector: "p",
            label: "Publisher:",
            relation: Traversal::NextAnchorTexts,
        };
        assert!(extract_field(doc.root_element(), &rule).is_empty());
    }

    #[test]
    fn test_direct_text_skips_nested_span() {
        let doc = Html::parse_document(LABELED_PAGE);
        let h1 = select_first(doc.root_element(), "h1").unwrap();
        assert_eq!(direct_text(h1), "Sample Title");
    }

    #[test]
    fn test_strip_query_removes_suffix() {
        assert_eq!(strip_query("https://x/img.jpg?sig=abc"), "https://x/img.jpg");
    }

    #[test]
    fn test_strip_query_is_idempotent() {
        let once = strip_query("https://x/img.jpg?sig=abc&t=1");
        let twice = strip_query(&once);
        assert_eq!(once, twice);
        // Already-stripped URLs are a fixed point
        assert_eq!(strip_query("https://x/img.jpg"), "https://x/img.jpg");
    }

    #[test]
    fn test_clean_name_whitespace_invariance() {
        assert_eq!(clean_name("Jane Doe"), "JaneDoe");
        assert_eq!(clean_name("  Jane \t Doe \n"), "JaneDoe");
        assert_eq!(clean_name("JaneDoe"), "JaneDoe");
        // Full-width space, common in the wild
        assert_eq!(clean_name("Jane\u{3000}Doe"), "JaneDoe");
    }

    #[test]
    fn test_first_number_from_phrase() {
        assert_eq!(first_number("Runtime: 95 min"), Some(95));
        assert_eq!(first_number("120 minutes (approx 2h)"), Some(120));
        assert_eq!(first_number("no digits here"), None);
        assert_eq!(first_number(""), None);
    }
}
