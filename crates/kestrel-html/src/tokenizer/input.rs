//! Input buffering for the streaming tokenizer.

use std::borrow::Cow;
use std::collections::VecDeque;

/// A chunk together with the stream offset of its first byte.
#[derive(Debug, Clone)]
struct Chunk {
    start: usize,
    data: String,
}

impl Chunk {
    fn end(&self) -> usize {
        self.start + self.data.len()
    }
}

/// The still-referenced tail of the input stream.
///
/// Indices are byte offsets into the concatenation of every chunk ever
/// pushed. Chunks that lie entirely before the oldest index the tokenizer
/// may still need are dropped by [`BufferChain::discard_before`], so memory
/// stays proportional to the unfinished section rather than the document.
#[derive(Debug, Clone, Default)]
pub struct BufferChain {
    chunks: VecDeque<Chunk>,
    end: usize,
}

impl BufferChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk to the stream.
    pub fn push(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.chunks.push_back(Chunk {
            start: self.end,
            data: chunk.to_owned(),
        });
        self.end += chunk.len();
    }

    /// Total number of bytes ever pushed.
    #[must_use]
    pub const fn end_index(&self) -> usize {
        self.end
    }

    /// Offset of the first byte still held, or [`Self::end_index`] when
    /// nothing is held.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.chunks.front().map_or(self.end, |c| c.start)
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn chunk_index(&self, index: usize) -> Option<usize> {
        if index < self.offset() || index >= self.end {
            return None;
        }
        Some(self.chunks.partition_point(|c| c.start <= index) - 1)
    }

    /// The byte at stream offset `index`, if still held.
    #[must_use]
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        let chunk = &self.chunks[self.chunk_index(index)?];
        chunk.data.as_bytes().get(index - chunk.start).copied()
    }

    /// Position of the first `byte` at or after `from`.
    #[must_use]
    pub fn find_byte(&self, from: usize, byte: u8) -> Option<usize> {
        let first = self.chunk_index(from)?;
        self.chunks.range(first..).find_map(|chunk| {
            let skip = from.saturating_sub(chunk.start);
            chunk.data.as_bytes()[skip..]
                .iter()
                .position(|&b| b == byte)
                .map(|pos| chunk.start + skip + pos)
        })
    }

    /// The text in `[start, end)`. Borrowed when the range lies within one
    /// chunk. Bytes no longer held read as empty.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Cow<'_, str> {
        let start = start.max(self.offset());
        let end = end.min(self.end);
        if start >= end {
            return Cow::Borrowed("");
        }
        let Some(first) = self.chunk_index(start) else {
            return Cow::Borrowed("");
        };

        let chunk = &self.chunks[first];
        if end <= chunk.end() {
            let bytes = &chunk.data.as_bytes()[start - chunk.start..end - chunk.start];
            return String::from_utf8_lossy(bytes);
        }

        let mut bytes = Vec::with_capacity(end - start);
        for chunk in self.chunks.range(first..) {
            if chunk.start >= end {
                break;
            }
            let from = start.saturating_sub(chunk.start);
            let to = (end - chunk.start).min(chunk.data.len());
            bytes.extend_from_slice(&chunk.data.as_bytes()[from..to]);
        }
        Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Drop every chunk that ends at or before `index`.
    pub fn discard_before(&mut self, index: usize) {
        while self.chunks.front().is_some_and(|c| c.end() <= index) {
            let _ = self.chunks.pop_front();
        }
    }

    /// Forget everything, including the stream position.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.end = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(parts: &[&str]) -> BufferChain {
        let mut chain = BufferChain::new();
        for part in parts {
            chain.push(part);
        }
        chain
    }

    #[test]
    fn test_byte_at_spans_chunks() {
        let chain = chain(&["ab", "", "cde", "f"]);
        assert_eq!(chain.end_index(), 6);
        assert_eq!(chain.chunk_count(), 3);
        let bytes: Vec<u8> = (0..6).filter_map(|i| chain.byte_at(i)).collect();
        assert_eq!(bytes, b"abcdef");
        assert_eq!(chain.byte_at(6), None);
    }

    #[test]
    fn test_slice_borrows_within_chunk() {
        let chain = chain(&["hello ", "world"]);
        assert!(matches!(chain.slice(0, 5), Cow::Borrowed("hello")));
        assert_eq!(chain.slice(3, 9), "lo wor");
        assert_eq!(chain.slice(4, 4), "");
    }

    #[test]
    fn test_slice_across_chunks_keeps_multibyte_text() {
        let chain = chain(&["caf", "\u{e9}!", "?"]);
        assert_eq!(chain.slice(0, 7), "caf\u{e9}!?");
    }

    #[test]
    fn test_discard_keeps_indices_stable() {
        let mut chain = chain(&["abc", "def", "ghi"]);
        chain.discard_before(4);
        assert_eq!(chain.offset(), 3);
        assert_eq!(chain.byte_at(2), None);
        assert_eq!(chain.byte_at(4), Some(b'e'));
        assert_eq!(chain.slice(0, 7), "defg");

        chain.discard_before(9);
        assert_eq!(chain.chunk_count(), 0);
        assert_eq!(chain.offset(), 9);
        chain.push("jk");
        assert_eq!(chain.byte_at(9), Some(b'j'));
    }

    #[test]
    fn test_find_byte() {
        let chain = chain(&["a<b", "cd", "e<"]);
        assert_eq!(chain.find_byte(0, b'<'), Some(1));
        assert_eq!(chain.find_byte(2, b'<'), Some(6));
        assert_eq!(chain.find_byte(2, b'>'), None);
    }
}
