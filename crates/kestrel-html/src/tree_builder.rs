//! Builds a [`DomTree`] from parser events.

use std::fmt;

use kestrel_dom::{DomTree, ElementData, NodeId, NodeType, is_void_element};
use serde::Deserialize;

use crate::error::ParseError;
use crate::parser::{Attributes, Handler, Location, Parser, ParserOptions};

/// Which source offsets to record on nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeBuilderOptions {
    /// Record [`Node::start_index`](kestrel_dom::Node::start_index).
    pub with_start_indices: bool,
    /// Record [`Node::end_index`](kestrel_dom::Node::end_index).
    pub with_end_indices: bool,
}

impl TreeBuilderOptions {
    /// Set [`Self::with_start_indices`].
    #[must_use]
    pub const fn with_start_indices(mut self, value: bool) -> Self {
        self.with_start_indices = value;
        self
    }

    /// Set [`Self::with_end_indices`].
    #[must_use]
    pub const fn with_end_indices(mut self, value: bool) -> Self {
        self.with_end_indices = value;
        self
    }
}

/// Called with each element once it is closed.
pub type ElementCallback = Box<dyn FnMut(&DomTree, NodeId)>;

/// A [`Handler`] that assembles the document into a [`DomTree`].
///
/// Elements are attached to their parent when they open, so the tree is
/// usable while parsing is still in progress. Consecutive text events merge
/// into one Text node, as do the pieces of one comment. CDATA content is
/// stored in a CDATA node.
pub struct TreeBuilder {
    tree: DomTree,
    options: TreeBuilderOptions,
    /// Open elements, innermost last. The document root stays at the bottom.
    tag_stack: Vec<NodeId>,
    /// HTML void elements never receive a close tag, so they are not
    /// pushed. Cleared for XML parsers.
    void_elements: bool,
    /// Text, CDATA or comment node that the next matching event extends.
    last_node: Option<NodeId>,
    element_callback: Option<ElementCallback>,
    errors: Vec<ParseError>,
    done: bool,
}

impl fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("nodes", &self.tree.len())
            .field("options", &self.options)
            .field("depth", &self.tag_stack.len())
            .field("errors", &self.errors)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(TreeBuilderOptions::default())
    }
}

impl TreeBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new(options: TreeBuilderOptions) -> Self {
        Self {
            tree: DomTree::new(),
            options,
            tag_stack: vec![NodeId::ROOT],
            void_elements: true,
            last_node: None,
            element_callback: None,
            errors: Vec::new(),
            done: false,
        }
    }

    /// Call `callback` with every element as it closes. Void elements are
    /// reported as soon as they open.
    #[must_use]
    pub fn with_element_callback(mut self, callback: impl FnMut(&DomTree, NodeId) + 'static) -> Self {
        self.element_callback = Some(Box::new(callback));
        self
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Consume the builder and return the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// Errors reported during the parse.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether the parse has ended.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    fn current_parent(&self) -> NodeId {
        self.tag_stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn add_node(&mut self, node_type: NodeType, location: Location) -> NodeId {
        let id = self.tree.alloc(node_type);
        if let Some(node) = self.tree.get_mut(id) {
            if self.options.with_start_indices {
                node.start_index = Some(location.start_index);
            }
            if self.options.with_end_indices {
                node.end_index = Some(location.end_index);
            }
        }
        self.tree.append_child(self.current_parent(), id);
        self.last_node = None;
        id
    }

    /// Append to the data of the last node if it is open for extension.
    /// Returns `false` when a new node is needed.
    fn extend_last(&mut self, data: &str, location: Location, comment: bool) -> bool {
        let Some(id) = self.last_node else {
            return false;
        };
        let with_end_indices = self.options.with_end_indices;
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        match (&mut node.node_type, comment) {
            (NodeType::Text(text) | NodeType::CData(text), false)
            | (NodeType::Comment(text), true) => {
                text.push_str(data);
                if with_end_indices {
                    node.end_index = Some(location.end_index);
                }
                true
            }
            _ => false,
        }
    }
}

impl Handler for TreeBuilder {
    fn on_parser_init(&mut self, options: ParserOptions) {
        self.void_elements = !options.xml_mode;
    }

    fn on_reset(&mut self) {
        self.tree = DomTree::new();
        self.tag_stack.clear();
        self.tag_stack.push(NodeId::ROOT);
        self.last_node = None;
        self.errors.clear();
        self.done = false;
    }

    fn on_open_tag(&mut self, name: &str, attributes: &Attributes, _implied: bool, location: Location) {
        let element = ElementData::new(name, attributes.clone());
        let id = self.add_node(NodeType::Element(element), location);
        if self.void_elements && is_void_element(name) {
            if let Some(callback) = self.element_callback.as_mut() {
                callback(&self.tree, id);
            }
        } else {
            self.tag_stack.push(id);
        }
    }

    fn on_close_tag(&mut self, _name: &str, _implied: bool, location: Location) {
        self.last_node = None;
        if self.tag_stack.len() <= 1 {
            return;
        }
        let Some(id) = self.tag_stack.pop() else {
            return;
        };
        if self.options.with_end_indices
            && let Some(node) = self.tree.get_mut(id)
        {
            node.end_index = Some(location.end_index);
        }
        if let Some(callback) = self.element_callback.as_mut() {
            callback(&self.tree, id);
        }
    }

    fn on_text(&mut self, text: &str, location: Location) {
        if !self.extend_last(text, location, false) {
            let id = self.add_node(NodeType::Text(text.to_owned()), location);
            self.last_node = Some(id);
        }
    }

    fn on_comment(&mut self, text: &str, location: Location) {
        if !self.extend_last(text, location, true) {
            let id = self.add_node(NodeType::Comment(text.to_owned()), location);
            self.last_node = Some(id);
        }
    }

    fn on_comment_end(&mut self, _location: Location) {
        self.last_node = None;
    }

    fn on_cdata_start(&mut self, location: Location) {
        let id = self.add_node(NodeType::CData(String::new()), location);
        self.last_node = Some(id);
    }

    fn on_cdata_end(&mut self, _location: Location) {
        self.last_node = None;
    }

    fn on_processing_instruction(&mut self, name: &str, data: &str, location: Location) {
        let _ = self.add_node(
            NodeType::ProcessingInstruction {
                name: name.to_owned(),
                data: data.to_owned(),
            },
            location,
        );
    }

    fn on_error(&mut self, error: &ParseError, _location: Location) {
        self.errors.push(error.clone());
    }

    fn on_end(&mut self, _location: Location) {
        self.done = true;
        self.last_node = None;
        log::trace!(target: "kestrel::tree_builder", "built {} nodes", self.tree.len());
    }
}

/// Parse a complete document with default tree options.
#[must_use]
pub fn parse_document(html: &str, options: ParserOptions) -> DomTree {
    parse_document_with(html, options, TreeBuilderOptions::default())
}

/// Parse a complete document, recording source offsets per `tree_options`.
#[must_use]
pub fn parse_document_with(html: &str, options: ParserOptions, tree_options: TreeBuilderOptions) -> DomTree {
    let mut parser = Parser::new(TreeBuilder::new(tree_options), options);
    // A fresh parser cannot already be ended.
    let _ = parser.end(Some(html));
    parser.into_handler().into_tree()
}
