//! Integration tests for the parser's nesting rules and handler events.

use kestrel_html::{Event, EventCollector, Location, ParseError, Parser, ParserOptions, QuoteType};

/// Helper to parse a complete document and return the events
fn events_with(input: &str, options: ParserOptions) -> Vec<Event> {
    let mut parser = Parser::new(EventCollector::new(), options);
    parser.end(Some(input)).unwrap();
    parser.into_handler().into_events()
}

fn events(input: &str) -> Vec<Event> {
    events_with(input, ParserOptions::default())
}

/// Helper to render open/close/text events as a compact trace
fn trace(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::OpenTag { name, implied, .. } => {
                Some(if *implied { format!("<{name}?>") } else { format!("<{name}>") })
            }
            Event::CloseTag { name, implied } => {
                Some(if *implied { format!("</{name}?>") } else { format!("</{name}>") })
            }
            Event::Text { text } => Some(format!("{text:?}")),
            _ => None,
        })
        .collect()
}

fn open(name: &str) -> Event {
    Event::OpenTagName { name: name.into() }
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        trace(&events("<ul><li>a<li>b</ul>")),
        vec![
            "<ul>", "<li>", "\"a\"", "</li?>", "<li>", "\"b\"", "</li?>", "</ul>"
        ]
    );
}

#[test]
fn test_block_closes_paragraph() {
    assert_eq!(
        trace(&events("<p>one<div>two</div>")),
        vec!["<p>", "\"one\"", "</p?>", "<div>", "\"two\"", "</div>"]
    );
}

#[test]
fn test_table_cells() {
    assert_eq!(
        trace(&events("<tr><td>1<td>2<tr><th>3")),
        vec![
            "<tr>", "<td>", "\"1\"", "</td?>", "<td>", "\"2\"", "</td?>", "</tr?>", "<tr>", "<th>",
            "\"3\"", "</th?>", "</tr?>"
        ]
    );
    assert_eq!(
        trace(&events("<tr><td>a<th>b<td>c")),
        vec![
            "<tr>", "<td>", "\"a\"", "</td?>", "<th>", "\"b\"", "</th?>", "<td>", "\"c\"", "</td?>",
            "</tr?>"
        ]
    );
    assert_eq!(
        trace(&events("<thead><th>h")),
        vec!["<thead>", "</thead?>", "<th>", "\"h\"", "</th?>"]
    );
}

#[test]
fn test_options_close_options() {
    assert_eq!(
        trace(&events("<select><option>a<option>b</select>")),
        vec![
            "<select>", "<option>", "\"a\"", "</option?>", "<option>", "\"b\"", "</option?>",
            "</select>"
        ]
    );
}

#[test]
fn test_void_element_has_no_close_event() {
    let log = events("<div><img src=a.png></img>x</div>");
    assert_eq!(trace(&log), vec!["<div>", "<img>", "\"x\"", "</div>"]);
    assert!(!log.iter().any(|e| matches!(e, Event::CloseTag { name, .. } if name == "img")));
}

#[test]
fn test_void_self_closing_in_html() {
    assert_eq!(trace(&events("<br/>text")), vec!["<br>", "\"text\""]);
    let options = ParserOptions::default().with_recognize_self_closing(true);
    assert_eq!(trace(&events_with("<hr/>x", options)), vec!["<hr>", "\"x\""]);
}

#[test]
fn test_self_closing_ignored_on_html_elements() {
    assert_eq!(
        trace(&events("<div/>x")),
        vec!["<div>", "\"x\"", "</div?>"]
    );
}

#[test]
fn test_recognize_self_closing() {
    let options = ParserOptions::default().with_recognize_self_closing(true);
    assert_eq!(
        trace(&events_with("<div/>x", options)),
        vec!["<div>", "</div?>", "\"x\""]
    );
}

#[test]
fn test_self_closing_script_keeps_raw_text_body() {
    assert_eq!(
        trace(&events("<script/>a<b>c</b>")),
        vec!["<script>", "\"a<b>c</b>\"", "</script?>"]
    );
    let options = ParserOptions::default().with_recognize_self_closing(true);
    assert_eq!(
        trace(&events_with("<script/>a<b>c</b>", options)),
        vec!["<script>", "</script?>", "\"a\"", "<b>", "\"c\"", "</b>"]
    );
}

#[test]
fn test_stray_paragraph_close_opens_empty_paragraph() {
    let log = events("a</p>b");
    assert_eq!(trace(&log), vec!["\"a\"", "<p?>", "</p>", "\"b\""]);
    assert!(log.contains(&open("p")));
}

#[test]
fn test_stray_br_close_is_a_line_break() {
    let log = events("a</br>b");
    assert_eq!(trace(&log), vec!["\"a\"", "<br?>", "\"b\""]);
}

#[test]
fn test_unmatched_close_is_ignored() {
    assert_eq!(trace(&events("<b>x</i>y</b>")), vec!["<b>", "\"xy\"", "</b>"]);
}

#[test]
fn test_close_tag_closes_nested_elements() {
    assert_eq!(
        trace(&events("<div><span><b>x</div>")),
        vec!["<div>", "<span>", "<b>", "\"x\"", "</b?>", "</span?>", "</div>"]
    );
}

#[test]
fn test_open_elements_closed_at_end() {
    assert_eq!(
        trace(&events("<html><body>x")),
        vec!["<html>", "<body>", "\"x\"", "</body?>", "</html?>"]
    );
    assert_eq!(events("<p>").last(), Some(&Event::End));
}

#[test]
fn test_names_are_lower_cased_in_html() {
    let log = events(r#"<DIV CLASS="x"></Div>"#);
    assert_eq!(trace(&log), vec!["<div>", "</div>"]);
    assert!(log.contains(&Event::Attribute {
        name: "class".into(),
        value: "x".into(),
        quote: QuoteType::Double,
    }));
}

#[test]
fn test_xml_mode_keeps_case_and_nesting() {
    let log = events_with("<Root><li>a<li>b</li></li><Item/></Root>", ParserOptions::xml());
    assert_eq!(
        trace(&log),
        vec!["<Root>", "<li>", "\"a\"", "<li>", "\"b\"", "</li>", "</li>", "<Item>", "</Item?>", "</Root>"]
    );
}

#[test]
fn test_xml_mode_has_no_void_elements() {
    let log = events_with("<br>x</br>", ParserOptions::xml());
    assert_eq!(trace(&log), vec!["<br>", "\"x\"", "</br>"]);
}

#[test]
fn test_svg_honors_self_closing() {
    assert_eq!(
        trace(&events("<svg><path/><circle/></svg><div/>x")),
        vec![
            "<svg>", "<path>", "</path?>", "<circle>", "</circle?>", "</svg>", "<div>", "\"x\"",
            "</div?>"
        ]
    );
}

#[test]
fn test_integration_point_leaves_foreign_context() {
    assert_eq!(
        trace(&events("<svg><foreignObject><div/>x</foreignObject><g/></svg>")),
        vec![
            "<svg>", "<foreignobject>", "<div>", "\"x\"", "</div?>", "</foreignobject>", "<g>",
            "</g?>", "</svg>"
        ]
    );
}

#[test]
fn test_self_closed_svg_leaves_foreign_context() {
    assert_eq!(
        trace(&events("<svg/><div/>x")),
        vec!["<svg>", "</svg?>", "<div>", "\"x\"", "</div?>"]
    );
}

#[test]
fn test_attributes_first_occurrence_wins() {
    let log = events("<a href=1 HREF=2 id>");
    let attributes = log.iter().find_map(|event| match event {
        Event::OpenTag { attributes, .. } => Some(attributes.clone()),
        _ => None,
    });
    let attributes = attributes.unwrap();
    assert_eq!(attributes.get("href").map(String::as_str), Some("1"));
    assert_eq!(attributes.get("id").map(String::as_str), Some(""));
    assert_eq!(
        log.iter().filter(|e| matches!(e, Event::Attribute { .. })).count(),
        3
    );
}

#[test]
fn test_attribute_quote_types() {
    let quotes: Vec<QuoteType> = events(r#"<a a b=1 c='2' d="3">"#)
        .into_iter()
        .filter_map(|event| match event {
            Event::Attribute { quote, .. } => Some(quote),
            _ => None,
        })
        .collect();
    assert_eq!(
        quotes,
        vec![QuoteType::NoValue, QuoteType::Unquoted, QuoteType::Single, QuoteType::Double]
    );
}

#[test]
fn test_cdata_is_a_comment_in_html() {
    let log = events("<![CDATA[x]]>");
    assert_eq!(
        log,
        vec![
            Event::Comment { text: "[CDATA[x]]".into() },
            Event::CommentEnd,
            Event::End,
        ]
    );
}

#[test]
fn test_cdata_recognized() {
    let expected = vec![
        Event::CdataStart,
        Event::Text { text: "a<b".into() },
        Event::CdataEnd,
        Event::End,
    ];
    assert_eq!(events_with("<![CDATA[a<b]]>", ParserOptions::xml()), expected);
    let options = ParserOptions::default().with_recognize_cdata(true);
    assert_eq!(events_with("<![CDATA[a<b]]>", options), expected);
}

#[test]
fn test_declaration_and_instruction() {
    let log = events("<!DOCTYPE html><?xml-stylesheet href=a?>");
    assert_eq!(
        log[..2],
        [
            Event::ProcessingInstruction {
                name: "!doctype".into(),
                data: "!DOCTYPE html".into(),
            },
            Event::ProcessingInstruction {
                name: "?xml-stylesheet".into(),
                data: "?xml-stylesheet href=a?".into(),
            },
        ]
    );
}

#[test]
fn test_entities_in_text_and_attributes() {
    let log = events(r#"<a title="x&amp;y" href="?a=1&copy=2">&lt;&#65;&#x42;</a>"#);
    assert!(log.contains(&Event::Attribute {
        name: "title".into(),
        value: "x&y".into(),
        quote: QuoteType::Double,
    }));
    assert!(log.contains(&Event::Attribute {
        name: "href".into(),
        value: "?a=1&copy=2".into(),
        quote: QuoteType::Double,
    }));
    assert!(log.contains(&Event::Text { text: "<AB".into() }));
}

#[test]
fn test_entity_errors_reach_handler() {
    let log = events("&#128; &amp");
    let errors: Vec<&str> = log
        .iter()
        .filter_map(|event| match event {
            Event::Error { message } => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        errors,
        vec![
            "invalid numeric character reference value 0x80 at byte 0",
            "missing semicolon after character reference at byte 7",
        ]
    );
}

#[test]
fn test_locations() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::default());
    parser.end(Some("<b>x</b>")).unwrap();
    let collector = parser.handler();
    let spans: Vec<(usize, usize)> = collector
        .locations()
        .iter()
        .map(|l| (l.start_index, l.end_index))
        .collect();
    assert_eq!(spans, vec![(0, 2), (0, 2), (3, 3), (4, 7), (8, 8)]);
    assert_eq!(parser.start_index(), 8);
}

#[test]
fn test_attribute_location() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::default());
    parser.end(Some(r#"<p id="a">"#)).unwrap();
    let collector = parser.handler();
    let index = collector
        .events()
        .iter()
        .position(|e| matches!(e, Event::Attribute { .. }))
        .unwrap();
    assert_eq!(
        collector.locations()[index],
        Location {
            start_index: 3,
            end_index: 9,
        }
    );
}

#[test]
fn test_write_after_end() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::default());
    parser.end(Some("x")).unwrap();
    assert_eq!(parser.write("y"), Err(ParseError::WriteAfterEnd));
    assert_eq!(parser.end(None), Err(ParseError::EndAfterEnd));
    let log = parser.into_handler().into_events();
    assert_eq!(
        &log[log.len() - 2..],
        &[
            Event::Error {
                message: "write() called after end()".into(),
            },
            Event::Error {
                message: "end() called after end()".into(),
            },
        ]
    );
}

#[test]
fn test_reset_and_parse_complete() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::default());
    parser.end(Some("<div>first")).unwrap();
    parser.parse_complete("<p>second</p>").unwrap();
    assert_eq!(trace(parser.handler().events()), vec!["<p>", "\"second\"", "</p>"]);
    assert!(parser.is_ended());
}

#[test]
fn test_unfinished_tag_is_dropped() {
    assert_eq!(trace(&events("<div>a<span cl")), vec!["<div>", "\"a\"", "</div?>"]);
}

#[test]
fn test_pause_from_handler() {
    let mut parser = Parser::new(EventCollector::new(), ParserOptions::default());
    parser.pause();
    parser.write("<i>a</i>").unwrap();
    assert!(parser.handler().events().is_empty());
    parser.end(None).unwrap();
    assert!(parser.handler().events().is_empty());
    parser.resume();
    assert_eq!(parser.handler().events().last(), Some(&Event::End));
    assert_eq!(parser.handler().text(), "a");
}

#[test]
fn test_options_from_json() {
    let options: ParserOptions =
        serde_json::from_str(r#"{"xmlMode": true, "lowerCaseTags": true, "recognizeCDATA": true}"#)
            .unwrap();
    assert!(options.xml_mode);
    assert!(options.decode_entities);
    assert_eq!(options.lower_case_tags, Some(true));
    assert!(options.recognize_cdata);

    let defaults: ParserOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, ParserOptions::default());
}

#[test]
fn test_events_serialize_with_a_tag() {
    let json = serde_json::to_value(events("<b>x</b>")).unwrap();
    assert_eq!(json[0], serde_json::json!({"event": "open_tag_name", "name": "b"}));
    assert_eq!(json[2], serde_json::json!({"event": "text", "text": "x"}));
    assert_eq!(
        json[3],
        serde_json::json!({"event": "close_tag", "name": "b", "implied": false})
    );
    assert_eq!(json[4], serde_json::json!({"event": "end"}));
}
