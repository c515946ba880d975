//! Streaming behaviour: chunking, byte input, buffering and pausing.

use std::io::Write;

use kestrel_html::{
    Attributes, Callbacks, CodePoints, Event, EventCollector, Handler, Location, Parser,
    ParserOptions, PauseHandle, QuoteType, Span, StreamWriter, Tokenizer, TokenizerOptions,
};
use quickcheck_macros::quickcheck;

const HTML_DOCUMENT: &str = "<!DOCTYPE html><html><head><title>A &amp; B</title></head>\
<body><p class=\"x\" id='y'>caf\u{e9} &copy 2024<br><img src=a.png alt=\"&lt;&gt;\"/></p>\
<ul><li>one<li>two</ul><!-- note --></body></html>";

const RAW_TEXT_DOCUMENT: &str = "<script>if (a < b && c) { w(\"</p>\"); }</script>\
<style>p > a {}</style><textarea>&lt;x&gt;</textarea><p>&#128;&notit;&#;</p>";

const FOREIGN_DOCUMENT: &str = "<svg viewBox=\"0 0 1 1\"><path d=\"M0 0\"/>\
<foreignObject><p>hi<br/></p></foreignObject></svg>\u{1F600} done";

const XML_DOCUMENT: &str = "<?xml version=\"1.0\"?><root xmlns:x=\"u\"><x:item a=\"1\"/>\
<![CDATA[ <raw> ]]><Item>t&#x41;&apos;&copy;</Item></root>";

/// Helper to parse `chunks` one write at a time and return the events
fn parse_chunks(chunks: &[&str], options: ParserOptions) -> Vec<Event> {
    let mut parser = Parser::new(EventCollector::new(), options);
    for chunk in chunks {
        parser.write(chunk).unwrap();
    }
    parser.end(None).unwrap();
    parser.into_handler().into_events()
}

/// Helper to separate errors from the other events and merge text that an
/// error had split.
fn normalize(events: Vec<Event>) -> (Vec<Event>, Vec<Event>) {
    let mut structure: Vec<Event> = Vec::new();
    let mut errors = Vec::new();
    for event in events {
        match event {
            Event::Error { .. } => errors.push(event),
            Event::Text { text } => {
                if let Some(Event::Text { text: previous }) = structure.last_mut() {
                    previous.push_str(&text);
                } else {
                    structure.push(Event::Text { text });
                }
            }
            other => structure.push(other),
        }
    }
    (structure, errors)
}

/// Helper to cut `input` at the given positions, snapped to char boundaries
fn split_at_positions<'a>(input: &'a str, positions: &[usize]) -> Vec<&'a str> {
    let mut cuts: Vec<usize> = positions
        .iter()
        .map(|p| {
            let mut p = p % (input.len() + 1);
            while !input.is_char_boundary(p) {
                p -= 1;
            }
            p
        })
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(&input[start..cut]);
        start = cut;
    }
    chunks.push(&input[start..]);
    chunks
}

/// Helper to check that a split parse matches the single-write parse
fn same_as_whole(input: &str, positions: &[usize], options: ParserOptions) -> bool {
    let whole = normalize(parse_chunks(&[input], options));
    let chunks = split_at_positions(input, positions);
    normalize(parse_chunks(&chunks, options)) == whole
}

// =============================================================================
// Chunk invariance
// =============================================================================

#[quickcheck]
fn prop_html_chunking_is_invisible(positions: Vec<usize>) -> bool {
    same_as_whole(HTML_DOCUMENT, &positions, ParserOptions::html())
}

#[quickcheck]
fn prop_raw_text_chunking_is_invisible(positions: Vec<usize>) -> bool {
    same_as_whole(RAW_TEXT_DOCUMENT, &positions, ParserOptions::html())
}

#[quickcheck]
fn prop_foreign_chunking_is_invisible(positions: Vec<usize>) -> bool {
    same_as_whole(FOREIGN_DOCUMENT, &positions, ParserOptions::html())
}

#[quickcheck]
fn prop_xml_chunking_is_invisible(positions: Vec<usize>) -> bool {
    same_as_whole(XML_DOCUMENT, &positions, ParserOptions::xml())
}

/// Pieces that exercise every tokenizer state when strung together.
const MARKUP_ATOMS: &[&str] = &[
    "<", "</", ">", "/>", "/", "&", "amp", "amp;", ";", "#", "#x", "41", "notin", "copy", "=",
    "\"", "'", " ", "\n", "<!--", "-->", "-", "<![CDATA[", "]]>", "<!", "<?", "?>", "script",
    "style", "title", "textarea", "svg", "math", "p", "br", "li", "td", "th", "x", "A",
    "\u{e9}", "\u{20ac}", "\u{1F600}",
];

/// Helper to build a document from atom indices
fn markup_from(atoms: &[u8]) -> String {
    atoms
        .iter()
        .map(|&i| MARKUP_ATOMS[usize::from(i) % MARKUP_ATOMS.len()])
        .collect()
}

#[quickcheck]
fn prop_generated_html_chunking_is_invisible(atoms: Vec<u8>, positions: Vec<usize>) -> bool {
    same_as_whole(&markup_from(&atoms), &positions, ParserOptions::html())
}

#[quickcheck]
fn prop_generated_xml_chunking_is_invisible(atoms: Vec<u8>, positions: Vec<usize>) -> bool {
    same_as_whole(&markup_from(&atoms), &positions, ParserOptions::xml())
}

#[test]
fn test_one_char_per_write() {
    for (input, options) in [
        (HTML_DOCUMENT, ParserOptions::html()),
        (RAW_TEXT_DOCUMENT, ParserOptions::html()),
        (FOREIGN_DOCUMENT, ParserOptions::html()),
        (XML_DOCUMENT, ParserOptions::xml()),
    ] {
        let chars: Vec<String> = input.chars().map(String::from).collect();
        let chunks: Vec<&str> = chars.iter().map(String::as_str).collect();
        assert_eq!(
            normalize(parse_chunks(&chunks, options)),
            normalize(parse_chunks(&[input], options)),
            "input: {input}"
        );
    }
}

#[test]
fn test_errors_survive_chunking() {
    let chunks = ["<p>&#1", "28;&no", "tit;&", "#;</p>"];
    let (_, errors) = normalize(parse_chunks(&chunks, ParserOptions::html()));
    let messages: Vec<String> = errors
        .into_iter()
        .map(|e| match e {
            Event::Error { message } => message,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            "invalid numeric character reference value 0x80 at byte 3",
            "missing semicolon after character reference at byte 9",
            "absence of digits in numeric character reference at byte 16",
        ]
    );
}

// =============================================================================
// Byte input
// =============================================================================

#[test]
fn test_stream_writer_one_byte_at_a_time() {
    let mut writer = StreamWriter::new(Parser::new(EventCollector::new(), ParserOptions::html()));
    for byte in FOREIGN_DOCUMENT.bytes() {
        writer.write_all(&[byte]).unwrap();
    }
    let parser = writer.finish().unwrap();

    let expected = parse_chunks(&[FOREIGN_DOCUMENT], ParserOptions::html());
    assert_eq!(
        normalize(parser.into_handler().into_events()),
        normalize(expected)
    );
}

#[test]
fn test_stream_writer_replaces_invalid_bytes() {
    let mut writer = StreamWriter::new(Parser::new(EventCollector::new(), ParserOptions::html()));
    writer.write_all(b"<p>a\xFFb</p>").unwrap();
    let parser = writer.finish().unwrap();
    assert_eq!(parser.handler().text(), "a\u{FFFD}b");
}

#[test]
fn test_stream_writer_flushes_partial_sequence() {
    let mut writer = StreamWriter::new(Parser::new(EventCollector::new(), ParserOptions::html()));
    writer.write_all(b"ab\xE2\x82").unwrap();
    assert_eq!(writer.parser().handler().text(), "ab");
    let parser = writer.finish().unwrap();
    assert_eq!(parser.handler().text(), "ab\u{FFFD}");
}

#[test]
fn test_stream_writer_after_end() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::html());
    parser.end(Some("x")).unwrap();
    let mut writer = StreamWriter::new(parser);
    assert!(writer.write_all(b"y").is_err());
    assert!(writer.write_all(b"").is_ok());
    assert!(writer.finish().is_err());
}

// =============================================================================
// Buffering
// =============================================================================

/// Callbacks that ignore everything.
struct Sink;

impl Callbacks for Sink {
    fn on_text(&mut self, _text: &str, _span: Span) {}
    fn on_text_entity(&mut self, _value: CodePoints, _span: Span) {}
    fn on_open_tag_name(&mut self, _name: &str, _span: Span) {}
    fn on_open_tag_end(&mut self, _end_index: usize) {}
    fn on_self_closing_tag(&mut self, _end_index: usize) -> bool {
        true
    }
    fn on_close_tag(&mut self, _name: &str, _end_index: usize) {}
    fn on_attrib_name(&mut self, _name: &str, _span: Span) {}
    fn on_attrib_data(&mut self, _data: &str, _span: Span) {}
    fn on_attrib_entity(&mut self, _value: CodePoints, _span: Span) {}
    fn on_attrib_end(&mut self, _quote: QuoteType, _end_index: usize) {}
    fn on_comment(&mut self, _text: &str, _end_index: usize) {}
    fn on_cdata(&mut self, _text: &str, _end_index: usize) {}
    fn on_declaration(&mut self, _text: &str, _end_index: usize) {}
    fn on_processing_instruction(&mut self, _text: &str, _end_index: usize) {}
    fn on_end(&mut self) {}
}

#[test]
fn test_finished_chunks_are_released() {
    let mut tokenizer = Tokenizer::new(TokenizerOptions::default());
    for _ in 0..100 {
        tokenizer.write("<p>hello</p>", &mut Sink);
        assert_eq!(tokenizer.buffered_chunks(), 0);
    }
    tokenizer.write("plain text", &mut Sink);
    assert_eq!(tokenizer.buffered_chunks(), 0);
}

#[test]
fn test_open_section_keeps_its_chunks() {
    let mut tokenizer = Tokenizer::new(TokenizerOptions::default());
    tokenizer.write("<!-- ", &mut Sink);
    for i in 0..10 {
        tokenizer.write("comment body ", &mut Sink);
        assert_eq!(tokenizer.buffered_chunks(), i + 2);
    }
    tokenizer.write("-->", &mut Sink);
    assert_eq!(tokenizer.buffered_chunks(), 0);
}

// =============================================================================
// Pausing
// =============================================================================

/// Collects tags and text, pausing when a `b` element opens.
#[derive(Default)]
struct PauseOnB {
    events: EventCollector,
    handle: Option<PauseHandle>,
}

impl Handler for PauseOnB {
    fn on_open_tag(&mut self, name: &str, attributes: &Attributes, implied: bool, location: Location) {
        self.events.on_open_tag(name, attributes, implied, location);
        if name == "b"
            && let Some(handle) = &self.handle
        {
            handle.pause();
        }
    }

    fn on_close_tag(&mut self, name: &str, implied: bool, location: Location) {
        self.events.on_close_tag(name, implied, location);
    }

    fn on_text(&mut self, text: &str, location: Location) {
        self.events.on_text(text, location);
    }

    fn on_end(&mut self, location: Location) {
        self.events.on_end(location);
    }
}

#[test]
fn test_pause_from_handler() {
    let mut parser = Parser::new(PauseOnB::default(), ParserOptions::html());
    parser.handler_mut().handle = Some(parser.pause_handle());

    parser.write("<a>1</a><b>2</b><i>3</i>").unwrap();
    assert!(parser.is_paused());
    assert_eq!(
        parser.handler().events.events().last(),
        Some(&Event::OpenTag {
            name: "b".into(),
            attributes: Default::default(),
            implied: false,
        })
    );
    assert_eq!(parser.handler().events.text(), "1");

    parser.end(None).unwrap();
    assert!(!parser.handler().events.events().contains(&Event::End));

    parser.resume();
    assert!(!parser.is_paused());
    let events = parser.into_handler().events.into_events();
    assert_eq!(events.last(), Some(&Event::End));

    let mut plain = Parser::new(EventCollector::new(), ParserOptions::html());
    plain.end(Some("<a>1</a><b>2</b><i>3</i>")).unwrap();
    let expected: Vec<Event> = plain
        .into_handler()
        .into_events()
        .into_iter()
        .filter(|e| !matches!(e, Event::OpenTagName { .. }))
        .collect();
    assert_eq!(events, expected);
}

#[test]
fn test_writes_queue_while_paused() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::html());
    parser.pause();
    parser.write("<em>queued").unwrap();
    parser.write("</em>").unwrap();
    assert!(parser.handler().events().is_empty());

    parser.resume();
    parser.end(None).unwrap();
    assert_eq!(parser.handler().text(), "queued");
    assert_eq!(parser.handler().events().last(), Some(&Event::End));
}
