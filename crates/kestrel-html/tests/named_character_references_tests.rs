//! Tests for the entity trie and the incremental reference decoder.

use kestrel_html::entities::{
    CodePoints, DecodeMode, DecodeStep, EntityDecoder, EntityError, EntityMatch, EntityTrie,
    decode_html, decode_html_attribute, decode_xml, replace_code_point,
};

/// Helper to feed `source` (everything after the `&`) and flush at the end
fn decode(source: &str, mode: DecodeMode) -> (DecodeStep, Vec<EntityError>) {
    decode_in(EntityTrie::html(), source, mode)
}

/// Helper to run the decoder over `source` with an explicit trie
fn decode_in(
    trie: &'static EntityTrie,
    source: &str,
    mode: DecodeMode,
) -> (DecodeStep, Vec<EntityError>) {
    let mut decoder = EntityDecoder::new(trie);
    decoder.start(mode);
    let mut step = DecodeStep::Pending;
    for byte in source.bytes() {
        step = decoder.feed(byte);
        if step != DecodeStep::Pending {
            break;
        }
    }
    if step == DecodeStep::Pending {
        step = decoder.end();
    }
    let errors = decoder.drain_errors().collect();
    (step, errors)
}

fn resolved(consumed: usize, value: char) -> DecodeStep {
    DecodeStep::Resolved(EntityMatch {
        consumed,
        value: CodePoints::single(value),
    })
}

#[test]
fn test_lookup_names() {
    let trie = EntityTrie::html();
    assert_eq!(trie.lookup("amp;"), Some(CodePoints::single('&')));
    assert_eq!(trie.lookup("amp"), Some(CodePoints::single('&')));
    assert_eq!(trie.lookup("notin;"), Some(CodePoints::single('\u{2209}')));
    assert_eq!(trie.lookup("notin"), None);
    assert_eq!(trie.lookup("am"), None);
    assert_eq!(
        trie.lookup("NotEqualTilde;"),
        Some(CodePoints::pair('\u{2242}', '\u{338}'))
    );
    assert_eq!(trie.lookup("fjlig;").map(|v| v.to_string()), Some("fj".into()));
    assert_eq!(
        trie.lookup("Afr;").map(|v| v.to_string()),
        Some("\u{1d504}".into())
    );
}

#[test]
fn test_xml_trie_has_only_five_names() {
    let trie = EntityTrie::xml();
    let names = [
        ("amp;", '&'),
        ("apos;", '\''),
        ("gt;", '>'),
        ("lt;", '<'),
        ("quot;", '"'),
    ];
    for (name, value) in names {
        assert_eq!(trie.lookup(name), Some(CodePoints::single(value)));
    }
    assert_eq!(trie.lookup("copy;"), None);
    assert_eq!(trie.lookup("amp"), None);
}

#[test]
fn test_terminated_named_reference() {
    assert_eq!(decode("amp;", DecodeMode::Legacy), (resolved(5, '&'), vec![]));
    assert_eq!(decode("amp;", DecodeMode::Strict), (resolved(5, '&'), vec![]));
}

#[test]
fn test_legacy_reference_without_semicolon() {
    assert_eq!(
        decode("amp b", DecodeMode::Legacy),
        (resolved(4, '&'), vec![EntityError::MissingSemicolon])
    );
    // Flushed by end of input.
    assert_eq!(
        decode("copy", DecodeMode::Legacy),
        (resolved(5, '\u{a9}'), vec![EntityError::MissingSemicolon])
    );
}

#[test]
fn test_longest_legacy_prefix_wins() {
    // `&notit;` is not a reference; `&not` is, and `it;` stays text.
    assert_eq!(
        decode("notit;", DecodeMode::Legacy),
        (resolved(4, '\u{ac}'), vec![EntityError::MissingSemicolon])
    );
    assert_eq!(decode("notin;", DecodeMode::Legacy), (resolved(7, '\u{2209}'), vec![]));
}

#[test]
fn test_non_legacy_name_needs_semicolon() {
    assert_eq!(decode("hellip ", DecodeMode::Legacy).0, DecodeStep::Rejected);
    assert_eq!(decode("hellip;", DecodeMode::Legacy).0, resolved(8, '\u{2026}'));
}

#[test]
fn test_attribute_mode() {
    assert_eq!(decode("amp=", DecodeMode::Attribute).0, DecodeStep::Rejected);
    assert_eq!(decode("ampx", DecodeMode::Attribute).0, DecodeStep::Rejected);
    assert_eq!(decode("amp1", DecodeMode::Attribute).0, DecodeStep::Rejected);
    assert_eq!(decode("amp&", DecodeMode::Attribute).0, resolved(4, '&'));
    assert_eq!(decode("amp", DecodeMode::Attribute).0, resolved(4, '&'));
    // Walked past the last terminal: `&noti` is not `&not` + `i`.
    assert_eq!(decode("noti\"", DecodeMode::Attribute).0, DecodeStep::Rejected);
    assert_eq!(decode("noti", DecodeMode::Attribute).0, DecodeStep::Rejected);
}

#[test]
fn test_strict_mode_rejects_unterminated() {
    assert_eq!(decode("amp ", DecodeMode::Strict).0, DecodeStep::Rejected);
    assert_eq!(decode("#65 ", DecodeMode::Strict).0, DecodeStep::Rejected);
    assert_eq!(
        decode_in(EntityTrie::xml(), "apos;", DecodeMode::Strict).0,
        resolved(6, '\'')
    );
}

#[test]
fn test_decimal_and_hex() {
    assert_eq!(decode("#65;", DecodeMode::Legacy), (resolved(5, 'A'), vec![]));
    assert_eq!(decode("#x41;", DecodeMode::Legacy), (resolved(6, 'A'), vec![]));
    assert_eq!(decode("#X6a;", DecodeMode::Legacy), (resolved(6, 'j'), vec![]));
    assert_eq!(
        decode("#65x", DecodeMode::Legacy),
        (resolved(4, 'A'), vec![EntityError::MissingSemicolon])
    );
}

#[test]
fn test_numeric_substitutions() {
    assert_eq!(
        decode("#128;", DecodeMode::Legacy),
        (resolved(6, '\u{20ac}'), vec![EntityError::InvalidNumeric { code: 0x80 }])
    );
    assert_eq!(
        decode("#xD800;", DecodeMode::Legacy),
        (resolved(8, '\u{fffd}'), vec![EntityError::InvalidNumeric { code: 0xd800 }])
    );
    assert_eq!(decode("#0;", DecodeMode::Legacy).0, resolved(4, '\u{fffd}'));
    // Saturates instead of overflowing.
    assert_eq!(
        decode("#99999999999999999999;", DecodeMode::Legacy).0,
        resolved(23, '\u{fffd}')
    );
}

#[test]
fn test_numeric_without_digits() {
    assert_eq!(
        decode("#;", DecodeMode::Legacy),
        (DecodeStep::Rejected, vec![EntityError::AbsenceOfDigits])
    );
    assert_eq!(
        decode("#x;", DecodeMode::Legacy),
        (DecodeStep::Rejected, vec![EntityError::AbsenceOfDigits])
    );
    assert_eq!(
        decode("#", DecodeMode::Legacy),
        (DecodeStep::Rejected, vec![EntityError::AbsenceOfDigits])
    );
}

#[test]
fn test_replace_code_point_table() {
    assert_eq!(replace_code_point(0x80), '\u{20ac}');
    assert_eq!(replace_code_point(0x9f), '\u{178}');
    assert_eq!(replace_code_point(0x81), '\u{81}');
    assert_eq!(replace_code_point(0xdfff), '\u{fffd}');
    assert_eq!(replace_code_point(0x11_0000), '\u{fffd}');
    assert_eq!(replace_code_point(0x1f600), '\u{1f600}');
}

#[test]
fn test_decoder_is_reusable() {
    let mut decoder = EntityDecoder::new(EntityTrie::html());
    decoder.start(DecodeMode::Legacy);
    assert_eq!(decoder.feed(b'#'), DecodeStep::Pending);
    assert_eq!(decoder.feed(b';'), DecodeStep::Rejected);
    decoder.start(DecodeMode::Legacy);
    for &byte in b"lt" {
        assert_eq!(decoder.feed(byte), DecodeStep::Pending);
    }
    assert_eq!(decoder.feed(b';'), resolved(4, '<'));
    assert_eq!(decoder.drain_errors().count(), 0);
}

#[test]
fn test_convenience_decoders() {
    assert_eq!(decode_html("&lt;p&gt; &amp &NotEqualTilde;"), "<p> & \u{2242}\u{338}");
    assert_eq!(decode_html_attribute("a=1&lang=en&amp;"), "a=1&lang=en&");
    assert_eq!(decode_xml("&lt;&#x3C;&nbsp;"), "<<&nbsp;");
}
