//! Substitution rules for numeric character references.
//!
//! A numeric reference can name any integer. Values that are not Unicode
//! scalar values become U+FFFD, and the C1 control range is read as
//! Windows-1252 the way browsers do.

/// U+FFFD REPLACEMENT CHARACTER.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Largest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// Windows-1252 reading of 0x80..=0x9F. Holes (0x81, 0x8D, 0x8F, 0x90, 0x9D)
/// are left as the C1 control itself.
const C1_REMAP: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Map the value of a numeric reference to the character it stands for.
///
/// U+0000, surrogates and values past U+10FFFF become U+FFFD.
#[must_use]
pub fn replace_code_point(code: u32) -> char {
    if code == 0 || (0xD800..=0xDFFF).contains(&code) || code > MAX_CODE_POINT {
        return REPLACEMENT;
    }
    if let Ok(pos) = C1_REMAP.binary_search_by_key(&code, |&(from, _)| from) {
        return C1_REMAP[pos].1;
    }
    char::from_u32(code).unwrap_or(REPLACEMENT)
}

/// Whether `code` is substituted by [`replace_code_point`].
#[must_use]
pub fn is_substituted(code: u32) -> bool {
    u32::from(replace_code_point(code)) != code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_1252_remap() {
        assert_eq!(replace_code_point(0x80), '\u{20AC}');
        assert_eq!(replace_code_point(0x9F), '\u{0178}');
        assert_eq!(replace_code_point(0x81), '\u{81}');
    }

    #[test]
    fn test_invalid_values_become_replacement() {
        assert_eq!(replace_code_point(0), REPLACEMENT);
        assert_eq!(replace_code_point(0xD800), REPLACEMENT);
        assert_eq!(replace_code_point(0xDFFF), REPLACEMENT);
        assert_eq!(replace_code_point(0x11_0000), REPLACEMENT);
        assert!(is_substituted(0xD800));
        assert!(!is_substituted(0x41));
    }
}
