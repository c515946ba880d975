//! Element tables driving the parser's nesting policy.

/// Roots of embedded SVG and MathML content.
const FOREIGN_CONTEXT_ELEMENTS: &[&str] = &["math", "svg"];

/// Elements inside foreign content whose children are HTML again.
const HTML_INTEGRATION_ELEMENTS: &[&str] = &[
    "mi",
    "mo",
    "mn",
    "ms",
    "mtext",
    "annotation-xml",
    "foreignobject",
    "desc",
    "title",
];

const FORM_TAGS: &[&str] = &[
    "input", "option", "optgroup", "select", "button", "datalist", "textarea",
];
const P_TAG: &[&str] = &["p"];
const TABLE_SECTION_TAGS: &[&str] = &["thead", "tbody"];
const DDT_TAGS: &[&str] = &["dd", "dt"];
const RTP_TAGS: &[&str] = &["rt", "rp"];

/// Open elements that a start tag named `name` closes when they are on top
/// of the stack. `<li>` closes an open `<li>`, `<div>` closes an open `<p>`.
pub(super) fn implied_closes(name: &str) -> &'static [&'static str] {
    match name {
        "tr" => &["tr", "th", "td"],
        "td" | "th" => &["thead", "th", "td"],
        "body" => &["head", "link", "script"],
        "li" => &["li"],
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "address" | "article" | "aside"
        | "blockquote" | "details" | "div" | "dl" | "fieldset" | "figcaption" | "figure"
        | "footer" | "form" | "header" | "hr" | "main" | "nav" | "ol" | "pre" | "section"
        | "table" | "ul" => P_TAG,
        "select" | "input" | "output" | "button" | "datalist" | "textarea" => FORM_TAGS,
        "option" => &["option"],
        "optgroup" => &["optgroup", "option"],
        "dd" | "dt" => DDT_TAGS,
        "rt" | "rp" => RTP_TAGS,
        "tbody" | "tfoot" => TABLE_SECTION_TAGS,
        _ => &[],
    }
}

/// Same table the serializer uses.
pub(super) fn is_void(name: &str) -> bool {
    kestrel_dom::is_void_element(name)
}

pub(super) fn is_foreign_context(name: &str) -> bool {
    FOREIGN_CONTEXT_ELEMENTS.contains(&name)
}

pub(super) fn is_html_integration(name: &str) -> bool {
    HTML_INTEGRATION_ELEMENTS.contains(&name)
}

/// Elements that push or pop an entry on the foreign-context stack.
pub(super) fn switches_context(name: &str) -> bool {
    is_foreign_context(name) || is_html_integration(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_elements_close_paragraphs() {
        for name in ["div", "ul", "h3", "table", "hr"] {
            assert_eq!(implied_closes(name), &["p"], "{name}");
        }
        assert!(implied_closes("span").is_empty());
    }

    #[test]
    fn test_table_cells() {
        assert!(implied_closes("td").contains(&"th"));
        assert!(implied_closes("tr").contains(&"td"));
        assert_eq!(implied_closes("th"), implied_closes("td"));
        assert!(!implied_closes("td").contains(&"tr"));
    }

    #[test]
    fn test_context_switches() {
        assert!(switches_context("svg"));
        assert!(switches_context("foreignobject"));
        assert!(!switches_context("foreignObject"));
        assert!(!switches_context("div"));
        assert!(is_void("img"));
        assert!(is_void("image"));
        assert!(!is_void("p"));
    }
}
