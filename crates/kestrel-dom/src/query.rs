use crate::{DomTree, NodeId, NodeType};

/// Pre-order iterator over the descendants of a node, excluding the node
/// itself.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

impl DomTree {
    /// Iterate over every descendant of `id` in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenation of every Text and CDATA descendant, in tree order.
    /// For a Text, Comment, CDATA or processing-instruction node this is
    /// the node's own data.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Text(data) | NodeType::Comment(data) | NodeType::CData(data) => data.clone(),
            NodeType::ProcessingInstruction { data, .. } => data.clone(),
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in self.descendants(id) {
                    if let Some(NodeType::Text(data) | NodeType::CData(data)) =
                        self.get(child).map(|n| &n.node_type)
                    {
                        out.push_str(data);
                    }
                }
                out
            }
        }
    }

    /// All descendant elements of `id` matching `predicate`, in document order.
    pub fn find_all<F>(&self, id: NodeId, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(&DomTree, NodeId) -> bool,
    {
        self.descendants(id)
            .filter(|&child| self.as_element(child).is_some() && predicate(self, child))
            .collect()
    }

    /// Descendant elements of `id` with the given tag name (ASCII
    /// case-insensitive).
    #[must_use]
    pub fn elements_by_tag_name(&self, id: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.find_all(id, |tree, child| {
            tree.as_element(child)
                .is_some_and(|el| el.tag_name.eq_ignore_ascii_case(tag_name))
        })
    }

    /// The first descendant element of `id` whose `id` attribute equals
    /// `element_id`.
    #[must_use]
    pub fn element_by_id(&self, id: NodeId, element_id: &str) -> Option<NodeId> {
        self.descendants(id).find(|&child| {
            self.as_element(child)
                .and_then(|el| el.id())
                .is_some_and(|v| v == element_id)
        })
    }
}
