//! Tests for the markup serializer.

use kestrel_dom::{
    AttributesMap, DomTree, ElementData, NodeId, NodeType, SerializeOptions, inner_html, is_void_element,
    serialize,
};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let attrs: AttributesMap = attrs
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let id = tree.alloc(NodeType::Element(ElementData::new(tag, attrs)));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, data: &str) {
    let id = tree.alloc(NodeType::Text(data.to_string()));
    tree.append_child(parent, id);
}

#[test]
fn test_text_is_escaped() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", &[]);
    text(&mut tree, p, "a < b & c > d\u{a0}");

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::html()),
        "<p>a &lt; b &amp; c &gt; d&nbsp;</p>"
    );
}

#[test]
fn test_attributes_sorted_and_escaped() {
    let mut tree = DomTree::new();
    let _ = element(
        &mut tree,
        NodeId::ROOT,
        "a",
        &[("title", "say \"hi\" & go"), ("href", "/x?a=1&b=2")],
    );

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::html()),
        "<a href=\"/x?a=1&amp;b=2\" title=\"say &quot;hi&quot; &amp; go\"></a>"
    );
}

#[test]
fn test_empty_attribute_written_bare() {
    let mut tree = DomTree::new();
    let _ = element(&mut tree, NodeId::ROOT, "input", &[("disabled", "")]);

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::html()),
        "<input disabled>"
    );
    assert_eq!(
        serialize(
            &tree,
            NodeId::ROOT,
            &SerializeOptions::html().with_empty_attrs(true)
        ),
        "<input disabled=\"\">"
    );
}

#[test]
fn test_void_elements_have_no_close_tag() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", &[]);
    let _ = element(&mut tree, div, "img", &[("src", "a.png")]);
    let _ = element(&mut tree, div, "br", &[]);

    assert_eq!(
        serialize(&tree, div, &SerializeOptions::html()),
        "<div><img src=\"a.png\"><br></div>"
    );
    assert_eq!(
        inner_html(
            &tree,
            div,
            &SerializeOptions::html().with_self_closing_tags(true)
        ),
        "<img src=\"a.png\" /><br />"
    );
}

#[test]
fn test_image_is_void_in_html() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", &[]);
    let _ = element(&mut tree, p, "image", &[]);
    assert_eq!(serialize(&tree, p, &SerializeOptions::html()), "<p><image></p>");
    assert!(is_void_element("image"));
}

#[test]
fn test_script_body_is_not_escaped() {
    let mut tree = DomTree::new();
    let script = element(&mut tree, NodeId::ROOT, "script", &[]);
    text(&mut tree, script, "if (a < b && c) {}");

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::html()),
        "<script>if (a < b && c) {}</script>"
    );
}

#[test]
fn test_comment_cdata_and_directive() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::ProcessingInstruction {
        name: "!doctype".to_string(),
        data: "!DOCTYPE html".to_string(),
    });
    tree.append_child(NodeId::ROOT, doctype);
    let comment = tree.alloc(NodeType::Comment(" note ".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let cdata = tree.alloc(NodeType::CData("x<y".to_string()));
    tree.append_child(NodeId::ROOT, cdata);

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::html()),
        "<!DOCTYPE html><!-- note --><![CDATA[x<y]]>"
    );
}

#[test]
fn test_svg_names_restore_case() {
    let mut tree = DomTree::new();
    let svg = element(&mut tree, NodeId::ROOT, "svg", &[("viewbox", "0 0 10 10")]);
    let gradient = element(&mut tree, svg, "lineargradient", &[]);
    let _ = element(&mut tree, gradient, "stop", &[("offset", "0")]);
    let fo = element(&mut tree, svg, "foreignobject", &[]);
    let _ = element(&mut tree, fo, "br", &[]);

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::html()),
        "<svg viewBox=\"0 0 10 10\"><linearGradient><stop offset=\"0\"/></linearGradient>\
         <foreignObject><br></foreignObject></svg>"
    );
}

#[test]
fn test_xml_mode_self_closes_and_escapes_quotes() {
    let mut tree = DomTree::new();
    let root = element(&mut tree, NodeId::ROOT, "feed", &[]);
    let _ = element(&mut tree, root, "link", &[("href", "a'b")]);
    let title = element(&mut tree, root, "title", &[]);
    text(&mut tree, title, "\"Q\" & A");

    assert_eq!(
        serialize(&tree, NodeId::ROOT, &SerializeOptions::xml()),
        "<feed><link href=\"a&apos;b\"/><title>&quot;Q&quot; &amp; A</title></feed>"
    );
}
