//! A small owned element tree over `quick-xml`.
//!
//! The decoder reads the whole document into this tree and walks it; the encoder
//! builds one and serializes it. Extension blocks keep their subtrees as-is.

use std::str::from_utf8;

use log::trace;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::error::{Location, Result, VastError};

/// An attribute in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

/// Nesting limit applied when no other is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Controls for [`Element::parse_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions<'a> {
    /// Documents nesting elements deeper than this are rejected as malformed.
    pub max_depth: usize,
    /// Local names of elements whose subtrees are kept exactly as written.
    pub verbatim: &'a [&'a str],
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            verbatim: &[],
        }
    }
}

impl ParseOptions<'_> {
    fn is_verbatim(&self, element: &Element) -> bool {
        self.verbatim.contains(&element.local_name())
    }
}

/// An XML element with its attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing an existing one of the same name in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    pub fn push_cdata(&mut self, text: impl Into<String>) {
        self.children.push(Node::CData(text.into()));
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenation of every text and CDATA child, trimmed.
    ///
    /// A URI split across several CDATA sections, or written partly as plain text,
    /// reads back as one string.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => text.push_str(t),
                Node::Element(_) => (),
            }
        }
        let trimmed = text.trim();
        if trimmed.len() == text.len() {
            text
        } else {
            trimmed.to_string()
        }
    }

    /// Parses a complete document with [`ParseOptions::default`].
    pub fn parse(xml: &[u8]) -> Result<Element> {
        Element::parse_with(xml, &ParseOptions::default())
    }

    /// Parses a complete document and returns its root element.
    ///
    /// Whitespace-only text between child elements is dropped, except inside
    /// the subtrees named in `options.verbatim`, which keep every text node.
    pub fn parse_with(xml: &[u8], options: &ParseOptions<'_>) -> Result<Element> {
        let xml = from_utf8(xml).map_err(|e| VastError::MalformedXml {
            position: e.valid_up_to() as u64,
            location: Location::root(),
            message: format!("input is not valid UTF-8: {}", e),
        })?;

        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        // stack height at which the outermost verbatim element was opened
        let mut verbatim_from: Option<usize> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| malformed(&reader, &stack, e.to_string()))?;
            match event {
                Event::Start(ref e) => {
                    let element = start_element(&reader, &stack, e)?;
                    if root.is_some() && stack.is_empty() {
                        return Err(malformed(&reader, &stack, "more than one root element"));
                    }
                    if stack.len() >= options.max_depth {
                        return Err(malformed(
                            &reader,
                            &stack,
                            format!("elements nested deeper than {}", options.max_depth),
                        ));
                    }
                    if verbatim_from.is_none() && options.is_verbatim(&element) {
                        verbatim_from = Some(stack.len());
                    }
                    stack.push(element);
                }
                Event::Empty(ref e) => {
                    let element = start_element(&reader, &stack, e)?;
                    if root.is_some() && stack.is_empty() {
                        return Err(malformed(&reader, &stack, "more than one root element"));
                    }
                    if stack.len() >= options.max_depth {
                        return Err(malformed(
                            &reader,
                            &stack,
                            format!("elements nested deeper than {}", options.max_depth),
                        ));
                    }
                    close_element(element, &mut stack, &mut root);
                }
                Event::End(_) => {
                    // quick-xml has already matched the end tag against the open one
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| malformed(&reader, &stack, "unexpected closing tag"))?;
                    match verbatim_from {
                        Some(height) if height == stack.len() => verbatim_from = None,
                        Some(_) => (),
                        None => element.drop_layout_whitespace(),
                    }
                    close_element(element, &mut stack, &mut root);
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| malformed(&reader, &stack, err.to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(text.into_owned()),
                        None if text.trim().is_empty() => (),
                        None => {
                            return Err(malformed(&reader, &stack, "text outside the root element"));
                        }
                    }
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = from_utf8(&bytes)
                        .map_err(|err| malformed(&reader, &stack, err.to_string()))?
                        .to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.push_cdata(text),
                        None => {
                            return Err(malformed(&reader, &stack, "CDATA outside the root element"));
                        }
                    }
                }
                Event::Eof => break,
                // declarations, comments, processing instructions and doctypes carry nothing we keep
                _ => (),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(malformed(&reader, &stack, "unexpected end of file"));
        }
        root.ok_or_else(|| malformed(&reader, &stack, "document has no root element"))
    }

    /// Removes whitespace-only text nodes when the element has child elements.
    fn drop_layout_whitespace(&mut self) {
        if self.elements().next().is_some() {
            self.children
                .retain(|node| !matches!(node, Node::Text(t) if t.trim().is_empty()));
        }
    }

    /// Serializes this element as a standalone document with an XML declaration.
    pub fn to_document(&self, indent: Option<usize>) -> Result<Vec<u8>> {
        self.to_document_with(indent, &[])
    }

    /// Like [`Element::to_document`], but the contents of elements named in
    /// `verbatim` are written exactly as stored, without indentation.
    pub fn to_document_with(&self, indent: Option<usize>, verbatim: &[&str]) -> Result<Vec<u8>> {
        let mut writer = match indent {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_element(&mut writer, verbatim)?;
        Ok(writer.into_inner())
    }

    /// Writes this element and its subtree.
    pub fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        self.write_element(writer, &[])
    }

    fn write_element(&self, writer: &mut Writer<Vec<u8>>, verbatim: &[&str]) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for attr in &self.attributes {
            start.push_attribute((attr.name.as_str(), attr.value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if verbatim.contains(&self.local_name()) {
            let mut raw = Writer::new(Vec::new());
            for child in &self.children {
                write_node(&mut raw, child, &[])?;
            }
            writer.get_mut().extend_from_slice(&raw.into_inner());
            // an empty text event stops the writer from indenting the end tag
            writer.write_event(Event::Text(BytesText::new("")))?;
        } else {
            for child in &self.children {
                write_node(writer, child, verbatim)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node, verbatim: &[&str]) -> Result<()> {
    match node {
        Node::Element(e) => e.write_element(writer, verbatim),
        Node::Text(t) => {
            writer.write_event(Event::Text(BytesText::new(t)))?;
            Ok(())
        }
        Node::CData(t) => write_cdata(writer, t),
    }
}

/// A CDATA section cannot contain `]]>`, so the payload is split across
/// adjacent sections at each occurrence.
fn write_cdata(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        let (head, tail) = rest.split_at(pos + 2);
        writer.write_event(Event::CData(BytesCData::new(head)))?;
        rest = tail;
    }
    writer.write_event(Event::CData(BytesCData::new(rest)))?;
    Ok(())
}

fn start_element(reader: &Reader<&[u8]>, stack: &[Element], start: &BytesStart) -> Result<Element> {
    let name = from_utf8(start.name().as_ref())
        .map_err(|e| malformed(reader, stack, e.to_string()))?
        .to_string();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, stack, e.to_string()))?;
        let key = from_utf8(attr.key.as_ref())
            .map_err(|e| malformed(reader, stack, e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(reader, stack, e.to_string()))?
            .into_owned();
        element.attributes.push(Attribute { name: key, value });
    }

    trace!("start element <{}>", element.name);
    Ok(element)
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => *root = Some(element),
    }
}

/// Builds a `MalformedXml` error pointing at the reader position and the open elements.
fn malformed(reader: &Reader<&[u8]>, stack: &[Element], message: impl Into<String>) -> VastError {
    let mut location = Location::root();
    for (depth, element) in stack.iter().enumerate() {
        // ordinal of the open element among its already-closed same-named siblings
        let ordinal = match depth {
            0 => 0,
            _ => stack[depth - 1]
                .elements()
                .filter(|e| e.name == element.name)
                .count(),
        };
        location = location.child(&element.name, ordinal);
    }
    VastError::MalformedXml {
        position: reader.buffer_position() as u64,
        location,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builds_tree_with_attributes_text_and_cdata() {
        let xml = br#"<?xml version="1.0"?>
            <!-- leading comment -->
            <Root a="1" b="x &amp; y">
                <Child>plain &lt;text&gt;</Child>
                <Child><![CDATA[http://example.com/?a=1&b=2]]></Child>
                <Empty/>
            </Root>"#;

        let root = Element::parse(xml).unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.attr("a"), Some("1"));
        assert_eq!(root.attr("b"), Some("x & y"));

        let children: Vec<_> = root.elements().collect();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].children, vec![Node::Text("plain <text>".into())]);
        assert_eq!(
            children[1].children,
            vec![Node::CData("http://example.com/?a=1&b=2".into())]
        );
        assert!(children[2].children.is_empty());
    }

    #[test]
    fn text_merges_text_and_cdata_children() {
        let root = Element::parse(b"<U>  http://a/<![CDATA[b?c=1]]>  </U>").unwrap();
        assert_eq!(root.text(), "http://a/b?c=1");
    }

    #[test]
    fn cdata_with_terminator_is_split_and_reads_back_whole() {
        let mut element = Element::new("HTMLResource");
        element.push_cdata("<p>a]]>b</p>");

        let bytes = element.to_document(None).unwrap();
        let written = String::from_utf8(bytes.clone()).unwrap();
        assert!(written.contains("<![CDATA[<p>a]]]]><![CDATA[>b</p>]]>"));

        let parsed = Element::parse(&bytes).unwrap();
        assert_eq!(parsed.text(), "<p>a]]>b</p>");
    }

    #[test]
    fn attribute_values_are_escaped_on_write() {
        let element = Element::new("A").with_attr("q", "\"x\" & <y>");
        let bytes = element.to_document(None).unwrap();
        let parsed = Element::parse(&bytes).unwrap();
        assert_eq!(parsed.attr("q"), Some("\"x\" & <y>"));
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        let err = Element::parse(b"<VAST><Ad></VAST>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn unclosed_document_is_malformed_with_open_path() {
        let err = Element::parse(b"<VAST><Ad><InLine>").unwrap_err();
        match err {
            VastError::MalformedXml { location, .. } => {
                assert_eq!(location.to_string(), "VAST[0]/Ad[0]/InLine[0]");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn second_root_is_malformed() {
        let err = Element::parse(b"<A/><B/>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn empty_input_has_no_root() {
        let err = Element::parse(b"   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = Element::parse(&[b'<', b'A', b'>', 0xff, b'<', b'/', b'A', b'>']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn text_keeps_inner_spaces_between_text_and_cdata() {
        let root = Element::parse(b"<AdTitle>Hello <![CDATA[World]]></AdTitle>").unwrap();
        assert_eq!(root.text(), "Hello World");
    }

    #[test]
    fn layout_whitespace_between_children_is_dropped() {
        let root = Element::parse(b"<R>\n  <A> a </A>\n  <B/>\n</R>").unwrap();
        assert_eq!(root.children.len(), 2);
        let a = root.elements().next().unwrap();
        assert_eq!(a.children, vec![Node::Text(" a ".into())]);
    }

    #[test]
    fn verbatim_subtrees_keep_every_text_node() {
        let xml = b"<R><X>\n  <Msg>  padded  </Msg>\n  <p>Hello <b>world</b> again</p>\n</X></R>";
        let options = ParseOptions {
            verbatim: &["X"],
            ..ParseOptions::default()
        };
        let root = Element::parse_with(xml, &options).unwrap();
        let x = root.elements().next().unwrap();
        assert_eq!(x.children.len(), 5);
        assert_eq!(x.children[0], Node::Text("\n  ".into()));

        let p = x.elements().nth(1).unwrap();
        assert_eq!(p.children.len(), 3);
        assert_eq!(p.children[0], Node::Text("Hello ".into()));
        assert_eq!(p.children[2], Node::Text(" again".into()));

        let written = String::from_utf8(root.to_document(None).unwrap()).unwrap();
        assert!(written.contains("<Msg>  padded  </Msg>"));
        assert!(written.contains("<p>Hello <b>world</b> again</p>"));
    }

    #[test]
    fn verbatim_contents_are_not_indented() {
        let root = Element::parse(b"<R><X k=\"v\"><a/><b>t</b></X><Y/></R>").unwrap();
        let written = String::from_utf8(root.to_document_with(Some(2), &["X"]).unwrap()).unwrap();
        assert!(written.contains("\n  <X k=\"v\"><a/><b>t</b></X>\n  <Y/>"));
    }

    #[test]
    fn nesting_beyond_limit_is_malformed() {
        let options = ParseOptions {
            max_depth: 3,
            ..ParseOptions::default()
        };
        assert!(Element::parse_with(b"<a><b><c/></b></a>", &options).is_ok());

        let err = Element::parse_with(b"<a><b><c><d/></c></b></a>", &options).unwrap_err();
        match err {
            VastError::MalformedXml { location, message, .. } => {
                assert_eq!(location.to_string(), "a[0]/b[0]/c[0]");
                assert!(message.contains("deeper than 3"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn deeply_nested_document_fails_without_overflowing() {
        let depth = 50_000;
        let mut xml = "<a>".repeat(depth);
        xml.push_str(&"</a>".repeat(depth));

        let err = Element::parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn local_name_strips_prefix() {
        assert_eq!(Element::new("ns:Thing").local_name(), "Thing");
        assert_eq!(Element::new("Thing").local_name(), "Thing");
    }
}
