//! Generic XML element tree built with `quick-xml`.
//!
//! Payloads are small, so the whole document is materialized. Names are stored
//! without their namespace prefix (`ge:country` -> `country`); repeated and
//! single children look the same, which spares callers the one-or-many dance.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name (namespace prefix stripped).
    pub name: String,
    /// Attributes by local name, in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA content directly inside this element.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    fn open(start: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }
}

/// A well-formed XML document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Parse `xml`, rejecting anything that is not a single well-formed document.
    ///
    /// Plain-text bodies (the vendor answers some errors that way) are rejected too.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
            match event {
                Event::Start(e) => {
                    if root.is_some() {
                        return Err("content after the root element".into());
                    }
                    stack.push(Element::open(&e)?);
                }
                Event::Empty(e) => {
                    if root.is_some() {
                        return Err("content after the root element".into());
                    }
                    let el = Element::open(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(el),
                        None => root = Some(el),
                    }
                }
                Event::End(_) => {
                    let el = stack.pop().ok_or("unmatched closing tag")?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(el),
                        None => root = Some(el),
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    match stack.last_mut() {
                        Some(el) => el.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err("text outside of the root element".into()),
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    match stack.last_mut() {
                        Some(el) => el.text.push_str(&text),
                        None => return Err("CDATA outside of the root element".into()),
                    }
                }
                Event::Eof => break,
                // declaration, comments, processing instructions, doctype
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(format!("unclosed element <{}>", stack[stack.len() - 1].name));
        }
        root.map(|root| Document { root })
            .ok_or_else(|| "no root element".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_tree() {
        let doc = Document::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <ge:data xmlns:ge="http://www.theglobaleconomy.com">
              <ge:country id="IN">
                <ge:element><ge:year>2020</ge:year><ge:value>1.5</ge:value></ge:element>
                <ge:element><ge:year>2021</ge:year><ge:value/></ge:element>
              </ge:country>
            </ge:data>"#,
        )
        .unwrap();
        assert_eq!(doc.root.name, "data");
        let country = doc.root.child("country").unwrap();
        assert_eq!(country.attr("id"), Some("IN"));
        let years: Vec<&str> = country
            .children_named("element")
            .filter_map(|e| e.child_text("year"))
            .collect();
        assert_eq!(years, vec!["2020", "2021"]);
        let second = country.children_named("element").nth(1).unwrap();
        assert_eq!(second.child_text("value"), Some(""));
    }

    #[test]
    fn unescapes_entities() {
        let doc = Document::parse("<a><b>R&amp;D spending</b></a>").unwrap();
        assert_eq!(doc.root.child_text("b"), Some("R&D spending"));
    }

    #[test]
    fn rejects_non_xml_bodies() {
        assert!(Document::parse("").is_err());
        assert!(Document::parse("Invalid uid or uidc").is_err());
        assert!(Document::parse("<a><b></a>").is_err());
        assert!(Document::parse("<a>").is_err());
        assert!(Document::parse("<a/><b/>").is_err());
    }
}
