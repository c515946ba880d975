//! Packed trie over reference names.
//!
//! The trie is a flat `Vec<u16>`. Every node starts with one header word:
//!
//! ```text
//!  15 14 13             7 6             0
//! +-----+----------------+---------------+
//! | val |  branch count  |   jump base   |
//! +-----+----------------+---------------+
//! ```
//!
//! The header is followed by `val` UTF-16 words of replacement text, then the
//! branch data:
//!
//! - branch count 0, jump base 0: a leaf.
//! - branch count 0, jump base `c`: a single child reached by `c`, stored
//!   immediately after this node.
//! - jump base `c` != 0: a jump table of `branch count` entries covering the
//!   edges `c..c + branch count`. Each entry holds `child + 1`, or 0 when the
//!   edge is absent.
//! - jump base 0: a dictionary of `branch count` sorted edge bytes followed by
//!   the matching child indices, searched with a binary search.
//!
//! Names are stored with their trailing `;` as an ordinary edge, so `amp` and
//! `amp;` are two nodes and only the legacy names have a terminal before the
//! semicolon.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::CodePoints;
use super::data::{HTML_ENTITIES, XML_ENTITIES};

const VALUE_LEN_SHIFT: u16 = 14;
const BRANCH_COUNT_SHIFT: u16 = 7;
const FIELD_MASK: u16 = 0x7F;

/// Decoded header word of a trie node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieNode {
    /// Number of UTF-16 value words after the header (0 = not a terminal).
    pub value_len: usize,
    /// Number of branch slots (dictionary size or jump table length).
    pub branch_count: usize,
    /// First edge of the jump table, or the single child's edge when
    /// `branch_count` is 0. Zero selects the dictionary layout.
    pub jump_base: u8,
}

impl TrieNode {
    /// Unpack a header word.
    #[must_use]
    pub const fn decode(word: u16) -> Self {
        Self {
            value_len: (word >> VALUE_LEN_SHIFT) as usize,
            branch_count: ((word >> BRANCH_COUNT_SHIFT) & FIELD_MASK) as usize,
            jump_base: (word & FIELD_MASK) as u8,
        }
    }

    /// Pack into a header word.
    #[must_use]
    pub fn encode(self) -> u16 {
        ((self.value_len as u16) << VALUE_LEN_SHIFT)
            | (((self.branch_count as u16) & FIELD_MASK) << BRANCH_COUNT_SHIFT)
            | (u16::from(self.jump_base) & FIELD_MASK)
    }

    /// Whether the node carries replacement text.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.value_len != 0
    }
}

/// Immutable lookup structure for reference names.
#[derive(Debug, Clone)]
pub struct EntityTrie {
    data: Vec<u16>,
}

static HTML_TRIE: LazyLock<EntityTrie> = LazyLock::new(|| EntityTrie::build(HTML_ENTITIES));
static XML_TRIE: LazyLock<EntityTrie> = LazyLock::new(|| EntityTrie::build(XML_ENTITIES));

impl EntityTrie {
    /// Index of the root node.
    pub const ROOT: usize = 0;

    /// The trie of HTML named references.
    #[must_use]
    pub fn html() -> &'static Self {
        &HTML_TRIE
    }

    /// The trie of the five predefined XML entities.
    #[must_use]
    pub fn xml() -> &'static Self {
        &XML_TRIE
    }

    /// Pack `(name, replacement)` pairs into a trie. Names must be ASCII and
    /// replacements at most three UTF-16 units long.
    #[must_use]
    pub fn build(entries: &[(&str, &str)]) -> Self {
        let mut root = BuildNode::default();
        for &(name, value) in entries {
            let mut node = &mut root;
            for byte in name.bytes() {
                node = node.children.entry(byte).or_default();
            }
            node.value = value.encode_utf16().collect();
        }

        let mut data = Vec::new();
        let _ = pack(&root, &mut data);
        log::trace!(target: "kestrel::entities", "packed {} names into {} words", entries.len(), data.len());
        Self { data }
    }

    /// Number of words in the packed representation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the trie is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Header of the node at `index`. Out-of-range indices read as a leaf.
    #[must_use]
    pub fn node(&self, index: usize) -> TrieNode {
        TrieNode::decode(self.data.get(index).copied().unwrap_or(0))
    }

    /// Follow the edge `byte` out of the node at `index`.
    #[must_use]
    pub fn child(&self, index: usize, byte: u8) -> Option<usize> {
        let node = self.node(index);
        let branches = index + 1 + node.value_len;

        if node.branch_count == 0 {
            return (node.jump_base != 0 && byte == node.jump_base).then_some(branches);
        }

        if node.jump_base != 0 {
            let slot = usize::from(byte.checked_sub(node.jump_base)?);
            if slot >= node.branch_count {
                return None;
            }
            let entry = *self.data.get(branches + slot)?;
            return usize::from(entry).checked_sub(1);
        }

        let keys = self.data.get(branches..branches + node.branch_count)?;
        let pos = keys.binary_search(&u16::from(byte)).ok()?;
        self.data
            .get(branches + node.branch_count + pos)
            .map(|&child| usize::from(child))
    }

    /// Replacement text of the node at `index`, if it is a terminal.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<CodePoints> {
        let node = self.node(index);
        if !node.is_terminal() {
            return None;
        }
        let words = self.data.get(index + 1..index + 1 + node.value_len)?;
        let mut chars = char::decode_utf16(words.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER));
        let first = chars.next()?;
        Some(match chars.next() {
            Some(second) => CodePoints::pair(first, second),
            None => CodePoints::single(first),
        })
    }

    /// Resolve a complete reference name such as `"amp;"` or `"copy"`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<CodePoints> {
        let mut index = Self::ROOT;
        for byte in name.bytes() {
            index = self.child(index, byte)?;
        }
        self.value(index)
    }
}

#[derive(Default)]
struct BuildNode {
    value: Vec<u16>,
    children: BTreeMap<u8, BuildNode>,
}

enum Layout {
    Leaf,
    Single(u8),
    Jump { base: u8, len: usize },
    Dictionary,
}

impl Layout {
    fn choose(keys: &[u8]) -> Self {
        match keys {
            [] => Self::Leaf,
            [only] => Self::Single(*only),
            [lo, .., hi] => {
                let span = usize::from(hi - lo) + 1;
                if span <= 2 * keys.len() {
                    Self::Jump { base: *lo, len: span }
                } else {
                    Self::Dictionary
                }
            }
        }
    }
}

/// Append `node` and its subtree to `data`, returning the node's index.
fn pack(node: &BuildNode, data: &mut Vec<u16>) -> usize {
    let index = data.len();
    let keys: Vec<u8> = node.children.keys().copied().collect();
    let layout = Layout::choose(&keys);

    let (branch_count, jump_base) = match layout {
        Layout::Leaf => (0, 0),
        Layout::Single(edge) => (0, edge),
        Layout::Jump { base, len } => (len, base),
        Layout::Dictionary => (keys.len(), 0),
    };
    data.push(
        TrieNode {
            value_len: node.value.len(),
            branch_count,
            jump_base,
        }
        .encode(),
    );
    data.extend_from_slice(&node.value);

    match layout {
        Layout::Leaf => {}
        Layout::Single(_) => {
            for child in node.children.values() {
                let _ = pack(child, data);
            }
        }
        Layout::Jump { base, len } => {
            let table = data.len();
            data.resize(table + len, 0);
            for (&edge, child) in &node.children {
                let child_index = pack(child, data);
                data[table + usize::from(edge - base)] = to_word(child_index + 1);
            }
        }
        Layout::Dictionary => {
            data.extend(keys.iter().map(|&k| u16::from(k)));
            let slots = data.len();
            data.resize(slots + keys.len(), 0);
            for (i, child) in node.children.values().enumerate() {
                let child_index = pack(child, data);
                data[slots + i] = to_word(child_index);
            }
        }
    }

    index
}

fn to_word(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        let node = TrieNode {
            value_len: 2,
            branch_count: 58,
            jump_base: b'A',
        };
        assert_eq!(TrieNode::decode(node.encode()), node);
    }

    #[test]
    fn test_every_html_name_resolves() {
        let trie = EntityTrie::html();
        assert!(trie.len() < usize::from(u16::MAX));
        for &(name, value) in HTML_ENTITIES {
            let found = trie.lookup(name).map(|cp| cp.to_string());
            assert_eq!(found.as_deref(), Some(value), "lookup of {name}");
        }
    }

    #[test]
    fn test_legacy_terminal_before_semicolon() {
        let trie = EntityTrie::html();
        assert_eq!(trie.lookup("amp").map(|c| c.first()), Some('&'));
        assert_eq!(trie.lookup("amp;").map(|c| c.first()), Some('&'));
        assert!(trie.lookup("hellip").is_none());
        assert_eq!(trie.lookup("hellip;").map(|c| c.first()), Some('\u{2026}'));
        assert!(trie.lookup("am").is_none());
    }

    #[test]
    fn test_two_code_point_value() {
        let value = EntityTrie::html().lookup("NotEqualTilde;");
        assert_eq!(value, Some(CodePoints::pair('\u{2242}', '\u{338}')));
    }

    #[test]
    fn test_xml_trie_only_has_predefined() {
        let trie = EntityTrie::xml();
        assert_eq!(trie.lookup("apos;").map(|c| c.first()), Some('\''));
        assert!(trie.lookup("nbsp;").is_none());
        assert!(trie.lookup("amp").is_none());
    }

    #[test]
    fn test_all_layouts_are_exercised() {
        let trie = EntityTrie::build(&[
            ("ab;", "1"),
            ("ac;", "2"),
            ("ad;", "3"),
            ("a", "4"),
            ("z;", "5"),
            ("zq;", "6"),
        ]);
        let root = trie.node(EntityTrie::ROOT);
        assert_eq!(root.jump_base, 0, "sparse root uses the dictionary");
        let a = trie.child(EntityTrie::ROOT, b'a').expect("edge a");
        let a_node = trie.node(a);
        assert!(a_node.is_terminal());
        assert_eq!(a_node.jump_base, b'b');
        assert_eq!(a_node.branch_count, 3);
        let ab = trie.child(a, b'b').expect("edge b");
        assert_eq!(trie.node(ab).branch_count, 0);
        assert_eq!(trie.node(ab).jump_base, b';');
        assert_eq!(trie.lookup("ac;").map(|c| c.first()), Some('2'));
        assert_eq!(trie.lookup("zq;").map(|c| c.first()), Some('6'));
        assert!(trie.child(a, b'e').is_none());
        assert!(trie.child(a, b'!').is_none());
    }
}
