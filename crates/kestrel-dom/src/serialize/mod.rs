//! Markup serializer.
//!
//! Turns a [`DomTree`] (or a subtree of it) back into HTML or XML text.
//! HTML output follows the usual browser conventions for void elements and
//! raw-text bodies. Foreign content (`svg`, `math`) is written XML-style
//! with the camel-cased SVG names restored.

mod foreign_names;

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Elements that never have content. HTML writes them without a closing
/// tag, and the parser never keeps them open.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "image", "img",
    "input", "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Whether `name` is in [`VOID_ELEMENTS`].
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Elements whose text children are written without escaping.
const UNESCAPED_TEXT_ELEMENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
    "noscript",
];

/// Elements that switch serialization into foreign (XML-style) mode.
const FOREIGN_ROOTS: &[&str] = &["svg", "math"];

/// Children of these elements are serialized as HTML again.
const FOREIGN_INTEGRATION_POINTS: &[&str] = &[
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

/// Options controlling markup output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Write XML: escape with the five XML entities and self-close every
    /// childless element.
    pub xml_mode: bool,
    /// In HTML mode, write void elements as `<br />`.
    pub self_closing_tags: bool,
    /// In HTML mode, write empty attribute values as `name=""` instead of
    /// the bare name.
    pub empty_attrs: bool,
}

impl SerializeOptions {
    /// HTML output with default settings.
    #[must_use]
    pub const fn html() -> Self {
        Self {
            xml_mode: false,
            self_closing_tags: false,
            empty_attrs: false,
        }
    }

    /// XML output.
    #[must_use]
    pub const fn xml() -> Self {
        Self {
            xml_mode: true,
            self_closing_tags: false,
            empty_attrs: false,
        }
    }

    /// Set [`Self::self_closing_tags`].
    #[must_use]
    pub const fn with_self_closing_tags(mut self, value: bool) -> Self {
        self.self_closing_tags = value;
        self
    }

    /// Set [`Self::empty_attrs`].
    #[must_use]
    pub const fn with_empty_attrs(mut self, value: bool) -> Self {
        self.empty_attrs = value;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Xml,
    Foreign,
}

impl Mode {
    const fn is_xml_like(self) -> bool {
        matches!(self, Self::Xml | Self::Foreign)
    }
}

/// Serialize `node` and its subtree. Serializing the document node writes
/// its children.
#[must_use]
pub fn serialize(tree: &DomTree, node: NodeId, options: &SerializeOptions) -> String {
    let mut out = String::new();
    let mode = if options.xml_mode { Mode::Xml } else { Mode::Html };
    Serializer {
        tree,
        options,
        out: &mut out,
    }
    .node(node, mode);
    out
}

/// Serialize the children of `node`.
#[must_use]
pub fn inner_html(tree: &DomTree, node: NodeId, options: &SerializeOptions) -> String {
    let mut out = String::new();
    let mode = if options.xml_mode { Mode::Xml } else { Mode::Html };
    let mut serializer = Serializer {
        tree,
        options,
        out: &mut out,
    };
    for &child in tree.children(node) {
        serializer.node(child, mode);
    }
    out
}

struct Serializer<'a> {
    tree: &'a DomTree,
    options: &'a SerializeOptions,
    out: &'a mut String,
}

impl Serializer<'_> {
    fn node(&mut self, id: NodeId, mode: Mode) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => {
                for &child in &node.children {
                    self.node(child, mode);
                }
            }
            NodeType::Element(data) => self.element(id, data, mode),
            NodeType::Text(text) => self.text(id, text, mode),
            NodeType::Comment(data) => {
                self.out.push_str("<!--");
                self.out.push_str(data);
                self.out.push_str("-->");
            }
            NodeType::CData(data) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(data);
                self.out.push_str("]]>");
            }
            NodeType::ProcessingInstruction { data, .. } => {
                self.out.push('<');
                self.out.push_str(data);
                self.out.push('>');
            }
        }
    }

    fn element(&mut self, id: NodeId, data: &ElementData, mut mode: Mode) {
        if mode == Mode::Foreign
            && self
                .parent_tag(id)
                .is_some_and(|p| FOREIGN_INTEGRATION_POINTS.contains(&p.to_ascii_lowercase().as_str()))
        {
            mode = Mode::Html;
        }
        if mode == Mode::Html && FOREIGN_ROOTS.contains(&data.tag_name.as_str()) {
            mode = Mode::Foreign;
        }

        let name = if mode == Mode::Foreign {
            foreign_names::element_name(&data.tag_name)
        } else {
            data.tag_name.as_str()
        };

        self.out.push('<');
        self.out.push_str(name);
        self.attributes(data, mode);

        let children = self.tree.children(id);
        let is_void = is_void_element(name);
        let self_close = children.is_empty()
            && (mode.is_xml_like() || (self.options.self_closing_tags && is_void));

        if self_close {
            if mode == Mode::Html {
                self.out.push(' ');
            }
            self.out.push_str("/>");
            return;
        }

        self.out.push('>');
        for &child in children {
            self.node(child, mode);
        }
        if mode.is_xml_like() || !is_void {
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        }
    }

    fn attributes(&mut self, data: &ElementData, mode: Mode) {
        let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
        attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));

        for (key, value) in attrs {
            let key = if mode == Mode::Foreign {
                foreign_names::attribute_name(key)
            } else {
                key.as_str()
            };
            self.out.push(' ');
            self.out.push_str(key);
            if mode == Mode::Html && value.is_empty() && !self.options.empty_attrs {
                continue;
            }
            self.out.push_str("=\"");
            if mode.is_xml_like() {
                escape_xml(value, self.out);
            } else {
                escape_attribute(value, self.out);
            }
            self.out.push('"');
        }
    }

    fn text(&mut self, id: NodeId, text: &str, mode: Mode) {
        if mode.is_xml_like() {
            escape_xml(text, self.out);
        } else if self
            .parent_tag(id)
            .is_some_and(|p| UNESCAPED_TEXT_ELEMENTS.contains(&p))
        {
            self.out.push_str(text);
        } else {
            escape_text(text, self.out);
        }
    }

    fn parent_tag(&self, id: NodeId) -> Option<&str> {
        let parent = self.tree.parent(id)?;
        self.tree.as_element(parent).map(|el| el.tag_name.as_str())
    }
}

/// Escape `& < >` and U+00A0 for HTML text content.
pub fn escape_text(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Escape `& "` and U+00A0 for a double-quoted HTML attribute value.
pub fn escape_attribute(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Escape with the five predefined XML entities.
pub fn escape_xml(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}
