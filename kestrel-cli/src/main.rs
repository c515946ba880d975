//! kestrel - parse HTML or XML and show what the parser produced
//!
//! Usage:
//!   kestrel <file>...               Print the node tree
//!   kestrel <file> -f html          Serialize the tree back to markup
//!   kestrel <file> -f json          Dump the tree as JSON
//!   kestrel <file> -f events        Print every parser event as a JSON line
//!   kestrel --html '<p>Hello'       Parse inline markup
//!
//! Set `RUST_LOG=debug` to see implied closes and other parser decisions.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser as _, ValueEnum};
use kestrel_common::warning::clear_warnings;
use kestrel_dom::{DomTree, NodeId, NodeType, SerializeOptions, serialize};
use kestrel_html::{
    EventCollector, Handler, Parser, ParserOptions, TreeBuilder, TreeBuilderOptions,
};
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

/// Longest text or comment shown in the tree view before it is cut.
const PREVIEW_CHARS: usize = 60;

/// Streaming HTML/XML parser: print trees, markup, JSON or raw events
#[derive(clap::Parser, Debug)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree of a file
    kestrel index.html

    # Parse an XML feed and print it back
    kestrel --xml -f html feed.xml

    # Show the event log for inline markup, fed in 4-byte chunks
    kestrel -f events --chunk-size 4 --html '<ul><li>a<li>b</ul>'

    # Load parser options from JSON
    kestrel --options '{"xmlMode": true, "lowerCaseTags": true}' doc.xml
"#)]
struct Cli {
    /// Files to parse
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Parse this markup instead of files
    #[arg(long, value_name = "MARKUP")]
    html: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Parse as XML
    #[arg(long)]
    xml: bool,

    /// Leave character references undecoded
    #[arg(long)]
    no_decode_entities: bool,

    /// Report CDATA sections as CDATA in HTML mode
    #[arg(long)]
    recognize_cdata: bool,

    /// Honor `/>` on non-void HTML elements
    #[arg(long)]
    recognize_self_closing: bool,

    /// Parser options as JSON (camelCase keys); flags are applied on top
    #[arg(long, value_name = "JSON")]
    options: Option<String>,

    /// Feed the input in chunks of this many bytes
    #[arg(long, value_name = "BYTES")]
    chunk_size: Option<usize>,

    /// Record and print source byte offsets
    #[arg(short, long)]
    indices: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented node tree
    Tree,
    /// Serialized markup
    Html,
    /// Node tree as JSON
    Json,
    /// Parser events, one JSON object per line
    Events,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let options = parser_options(&cli)?;

    for (name, input) in load_inputs(&cli)? {
        // Each document gets its own warning budget.
        clear_warnings();
        if cli.paths.len() > 1 {
            println!("=== {name} ===");
        }
        match cli.format {
            Format::Events => print_events(&cli, &input, options)?,
            format => print_document(&cli, format, &input, options)?,
        }
    }
    Ok(())
}

/// Build parser options from `--options` and the individual flags
fn parser_options(cli: &Cli) -> Result<ParserOptions> {
    let mut options = match &cli.options {
        Some(json) => serde_json::from_str(json).context("invalid --options JSON")?,
        None => ParserOptions::default(),
    };
    if cli.xml {
        options = options.with_xml_mode(true);
    }
    if cli.no_decode_entities {
        options = options.with_decode_entities(false);
    }
    if cli.recognize_cdata {
        options = options.with_recognize_cdata(true);
    }
    if cli.recognize_self_closing {
        options = options.with_recognize_self_closing(true);
    }
    log::debug!("parser options: {options:?}");
    Ok(options)
}

/// Read every input as `(display name, contents)`
fn load_inputs(cli: &Cli) -> Result<Vec<(String, String)>> {
    if let Some(markup) = &cli.html {
        return Ok(vec![("<inline>".to_owned(), markup.clone())]);
    }
    if cli.paths.is_empty() {
        bail!("no input: pass a file path or --html");
    }
    cli.paths
        .iter()
        .map(|path| {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading '{}'", path.display()))?;
            Ok((path.display().to_string(), contents))
        })
        .collect()
}

/// Split `input` into pieces of about `size` bytes on char boundaries
fn split_chunks(input: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let mut end = size.min(rest.len());
        while !rest.is_char_boundary(end) {
            end += 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Run a whole document through a parser driving `handler`
fn run_parser<H: Handler>(
    handler: H,
    input: &str,
    options: ParserOptions,
    chunk_size: Option<usize>,
) -> Result<H> {
    let mut parser = Parser::new(handler, options);
    match chunk_size.filter(|&size| size > 0) {
        Some(size) => {
            for chunk in split_chunks(input, size) {
                parser.write(chunk)?;
            }
            parser.end(None)?;
        }
        None => parser.end(Some(input))?,
    }
    Ok(parser.into_handler())
}

fn print_events(cli: &Cli, input: &str, options: ParserOptions) -> Result<()> {
    let collector = run_parser(EventCollector::new(), input, options, cli.chunk_size)?;
    for (event, location) in collector.events().iter().zip(collector.locations()) {
        let mut value = serde_json::to_value(event)?;
        if cli.indices
            && let Value::Object(fields) = &mut value
        {
            let _ = fields.insert("start".to_owned(), json!(location.start_index));
            let _ = fields.insert("end".to_owned(), json!(location.end_index));
        }
        println!("{value}");
    }
    Ok(())
}

fn print_document(cli: &Cli, format: Format, input: &str, options: ParserOptions) -> Result<()> {
    let tree_options = TreeBuilderOptions::default()
        .with_start_indices(cli.indices)
        .with_end_indices(cli.indices);
    let builder = run_parser(TreeBuilder::new(tree_options), input, options, cli.chunk_size)?;
    for error in builder.errors() {
        if cli.no_color {
            eprintln!("warning: {error}");
        } else {
            eprintln!("{}: {error}", "warning".yellow());
        }
    }
    let tree = builder.into_tree();

    match format {
        Format::Html => {
            let serialize_options = if options.xml_mode {
                SerializeOptions::xml()
            } else {
                SerializeOptions::html()
            };
            println!("{}", serialize(&tree, tree.root(), &serialize_options));
        }
        Format::Json => {
            let value = node_to_json(&tree, tree.root());
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Format::Tree | Format::Events => {
            let palette = Palette {
                color: !cli.no_color,
            };
            print_tree(&tree, tree.root(), 0, palette);
        }
    }
    Ok(())
}

// =============================================================================
// Tree view
// =============================================================================

#[derive(Clone, Copy)]
struct Palette {
    color: bool,
}

impl Palette {
    fn tag(self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_owned()
        }
    }

    fn attr(self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_owned()
        }
    }

    fn text(self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_owned()
        }
    }

    fn dim(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_owned()
        }
    }
}

/// Cut `text` to at most [`PREVIEW_CHARS`] characters.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

fn print_tree(tree: &DomTree, id: NodeId, depth: usize, palette: Palette) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let span = match (node.start_index, node.end_index) {
        (Some(start), Some(end)) => palette.dim(&format!(" [{start}..={end}]")),
        (Some(start), None) => palette.dim(&format!(" [{start}..]")),
        _ => String::new(),
    };

    match &node.node_type {
        NodeType::Document => println!("{indent}{}", palette.dim("#document")),
        NodeType::Element(data) => {
            let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
            attrs.sort();
            let mut line = format!("<{}", palette.tag(&data.tag_name));
            for (name, value) in attrs {
                if value.is_empty() {
                    line.push_str(&format!(" {}", palette.attr(name)));
                } else {
                    line.push_str(&format!(" {}=\"{value}\"", palette.attr(name)));
                }
            }
            println!("{indent}{line}>{span}");
        }
        NodeType::Text(text) => {
            let display = preview(text).replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{indent}{}{span}", palette.text(&format!("\"{display}\"")));
        }
        NodeType::Comment(text) => {
            println!("{indent}{}{span}", palette.dim(&format!("<!--{}-->", preview(text))));
        }
        NodeType::CData(text) => {
            println!("{indent}{}{span}", palette.dim(&format!("<![CDATA[{}]]>", preview(text))));
        }
        NodeType::ProcessingInstruction { data, .. } => {
            println!("{indent}{}{span}", palette.dim(&format!("<{}>", preview(data))));
        }
    }

    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1, palette);
    }
}

// =============================================================================
// JSON view
// =============================================================================

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let mut obj = Map::new();
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };

    match &node.node_type {
        NodeType::Document => {
            let _ = obj.insert("type".to_owned(), json!("document"));
        }
        NodeType::Element(data) => {
            let _ = obj.insert("type".to_owned(), json!("element"));
            let _ = obj.insert("tagName".to_owned(), json!(data.tag_name));
            let attrs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            let _ = obj.insert("attributes".to_owned(), Value::Object(attrs));
        }
        NodeType::Text(text) => {
            let _ = obj.insert("type".to_owned(), json!("text"));
            let _ = obj.insert("content".to_owned(), json!(text));
        }
        NodeType::Comment(text) => {
            let _ = obj.insert("type".to_owned(), json!("comment"));
            let _ = obj.insert("content".to_owned(), json!(text));
        }
        NodeType::CData(text) => {
            let _ = obj.insert("type".to_owned(), json!("cdata"));
            let _ = obj.insert("content".to_owned(), json!(text));
        }
        NodeType::ProcessingInstruction { name, data } => {
            let _ = obj.insert("type".to_owned(), json!("processingInstruction"));
            let _ = obj.insert("name".to_owned(), json!(name));
            let _ = obj.insert("data".to_owned(), json!(data));
        }
    }

    if let Some(start) = node.start_index {
        let _ = obj.insert("startIndex".to_owned(), json!(start));
    }
    if let Some(end) = node.end_index {
        let _ = obj.insert("endIndex".to_owned(), json!(end));
    }

    let children = tree.children(id);
    if !children.is_empty() {
        let children: Vec<Value> = children
            .iter()
            .map(|&child| node_to_json(tree, child))
            .collect();
        let _ = obj.insert("children".to_owned(), Value::Array(children));
    }

    Value::Object(obj)
}
