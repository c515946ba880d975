//! Character reference decoding.
//!
//! Named references (`&amp;`, `&notin;`, legacy `&copy`) are resolved through a
//! packed [`EntityTrie`]. Numeric references (`&#65;`, `&#x41;`) are accumulated
//! by the [`EntityDecoder`] and passed through the substitution rules in
//! [`numeric`].

mod data;
/// Incremental reference decoder.
pub mod decoder;
/// Numeric reference substitution.
pub mod numeric;
/// Packed lookup trie for named references.
pub mod trie;

use std::fmt;

pub use decoder::{DecodeMode, DecodeStep, EntityDecoder, EntityError, EntityMatch};
pub use numeric::replace_code_point;
pub use trie::{EntityTrie, TrieNode};

/// The one or two code points a character reference decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePoints {
    first: char,
    second: Option<char>,
}

impl CodePoints {
    /// A single code point.
    #[must_use]
    pub const fn single(c: char) -> Self {
        Self {
            first: c,
            second: None,
        }
    }

    /// Two code points, e.g. `&NotEqualTilde;` (U+2242 U+0338).
    #[must_use]
    pub const fn pair(first: char, second: char) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }

    /// The first code point.
    #[must_use]
    pub const fn first(&self) -> char {
        self.first
    }

    /// The second code point, if any.
    #[must_use]
    pub const fn second(&self) -> Option<char> {
        self.second
    }

    /// Iterate over the code points.
    pub fn chars(&self) -> impl Iterator<Item = char> + use<> {
        std::iter::once(self.first).chain(self.second)
    }

    /// Append the code points to `out`.
    pub fn push_to(&self, out: &mut String) {
        out.push(self.first);
        if let Some(second) = self.second {
            out.push(second);
        }
    }
}

impl fmt::Display for CodePoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::with_capacity(8);
        self.push_to(&mut buf);
        f.write_str(&buf)
    }
}

/// Decode every character reference in `input` using HTML text rules.
///
/// This is the convenience form of the [`EntityDecoder`]; the tokenizer feeds
/// the decoder directly instead.
#[must_use]
pub fn decode_html(input: &str) -> String {
    decode_with(input, EntityTrie::html(), DecodeMode::Legacy)
}

/// Decode `input` as an attribute value: ambiguous legacy references are left
/// alone.
#[must_use]
pub fn decode_html_attribute(input: &str) -> String {
    decode_with(input, EntityTrie::html(), DecodeMode::Attribute)
}

/// Decode the five XML entities and numeric references in `input`.
#[must_use]
pub fn decode_xml(input: &str) -> String {
    decode_with(input, EntityTrie::xml(), DecodeMode::Strict)
}

fn decode_with(input: &str, trie: &'static EntityTrie, mode: DecodeMode) -> String {
    let bytes = input.as_bytes();
    let mut decoder = EntityDecoder::new(trie);
    let mut out = String::with_capacity(input.len());
    let mut section_start = 0;
    let mut cursor = 0;

    while let Some(offset) = bytes[cursor..].iter().position(|&b| b == b'&') {
        let entity_start = cursor + offset;
        decoder.start(mode);

        let mut step = DecodeStep::Pending;
        let mut pos = entity_start + 1;
        while let (DecodeStep::Pending, Some(&b)) = (&step, bytes.get(pos)) {
            step = decoder.feed(b);
            pos += 1;
        }
        if matches!(step, DecodeStep::Pending) {
            step = decoder.end();
        }

        match step {
            DecodeStep::Resolved(found) => {
                out.push_str(&input[section_start..entity_start]);
                found.value.push_to(&mut out);
                section_start = entity_start + found.consumed;
                cursor = section_start;
            }
            DecodeStep::Pending | DecodeStep::Rejected => cursor = entity_start + 1,
        }
    }

    out.push_str(&input[section_start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_html_mixed() {
        assert_eq!(decode_html("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_html("&copy 2024"), "\u{a9} 2024");
        assert_eq!(decode_html("&#65;&#x42;&#x1F600;"), "AB\u{1F600}");
        assert_eq!(decode_html("5 & 6 &unknown;"), "5 & 6 &unknown;");
    }

    #[test]
    fn test_decode_attribute_keeps_ambiguous() {
        assert_eq!(decode_html_attribute("?a=1&copy=2"), "?a=1&copy=2");
        assert_eq!(decode_html_attribute("&copy;"), "\u{a9}");
    }

    #[test]
    fn test_decode_xml_is_strict() {
        assert_eq!(decode_xml("&amp;&apos;&copy;&lt"), "&'&copy;&lt");
    }
}
