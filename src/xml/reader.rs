//! XML element tree reader
//!
//! A small recursive descent parser covering what the gateway sends back:
//! elements, attributes, text, CDATA, comments and the predefined entities.
//! DTDs and namespaces are not interpreted.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use serde_json::Map;

/// Deepest element nesting accepted by [`XmlNode::parse`]
pub const MAX_DEPTH: usize = 256;

/// A parsed XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlNode>,
    /// Concatenated text content (entities decoded)
    pub text: String,
}

impl XmlNode {
    /// Parse a document and return its root element
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser {
            input,
            pos: 0,
            depth: 0,
        };
        parser.skip_misc()?;
        if parser.at_end() {
            return Err(Error::xml("Document has no root element"));
        }
        if !parser.rest().starts_with('<') {
            return Err(Error::xml("Input does not appear to be XML"));
        }

        let root = parser.parse_element()?;

        parser.skip_misc()?;
        if !parser.at_end() {
            return Err(Error::xml(format!(
                "Unexpected content after root element at byte {}",
                parser.pos
            )));
        }
        Ok(root)
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// Convert to JSON: leaves become strings, containers become objects and
    /// repeated child names become arrays
    pub fn to_value(&self) -> JsonValue {
        if self.children.is_empty() {
            return JsonValue::String(self.text.clone());
        }
        JsonValue::Object(self.to_record())
    }

    /// Convert the children of this element into a record
    pub fn to_record(&self) -> Record {
        let mut obj = Map::new();
        for child in &self.children {
            let value = child.to_value();
            match obj.get_mut(&child.name) {
                Some(JsonValue::Array(arr)) => arr.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = JsonValue::Array(vec![first, value]);
                }
                None => {
                    obj.insert(child.name.clone(), value);
                }
            }
        }
        obj
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Advance past `terminator`, failing if it never appears
    fn skip_past(&mut self, terminator: &str, what: &str) -> Result<&'a str> {
        let rest = self.rest();
        let end = rest
            .find(terminator)
            .ok_or_else(|| Error::xml(format!("Unterminated {what}")))?;
        self.pos += end + terminator.len();
        Ok(&rest[..end])
    }

    /// Skip whitespace, declarations, processing instructions, comments and DOCTYPE
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if rest.starts_with("<!DOCTYPE") {
                self.skip_past(">", "DOCTYPE")?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_name(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '='))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(Error::xml(format!("Expected a name at byte {}", self.pos)));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(Error::xml(format!(
                "Expected '{token}' at byte {}",
                self.pos
            )))
        }
    }

    fn parse_element(&mut self) -> Result<XmlNode> {
        self.depth += 1;
        let node = self.parse_element_inner();
        self.depth -= 1;
        node
    }

    fn parse_element_inner(&mut self) -> Result<XmlNode> {
        if self.depth > MAX_DEPTH {
            return Err(Error::xml(format!(
                "Elements nested deeper than {MAX_DEPTH} levels at byte {}",
                self.pos
            )));
        }
        self.expect("<")?;
        let mut node = XmlNode {
            name: self.parse_name()?.to_string(),
            ..Default::default()
        };

        // Attributes
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(node);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.is_empty() {
                return Err(Error::xml(format!("Malformed tag <{}>", node.name)));
            }

            let key = self.parse_name()?.to_string();
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => {
                    return Err(Error::xml(format!(
                        "Attribute '{key}' on <{}> is not quoted",
                        node.name
                    )))
                }
            };
            self.pos += 1;
            let raw = self.skip_past(&quote.to_string(), "attribute value")?;
            node.attributes.push((key, unescape(raw)?));
        }

        // Content
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(Error::xml(format!(
                    "Missing closing tag for {}",
                    node.name
                )));
            }

            if rest.starts_with("</") {
                self.pos += 2;
                let closing = self.parse_name()?;
                if closing != node.name {
                    return Err(Error::xml(format!(
                        "Mismatched closing tag: expected </{}>, found </{closing}>",
                        node.name
                    )));
                }
                self.skip_whitespace();
                self.expect(">")?;
                return Ok(node);
            } else if rest.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if rest.starts_with("<![CDATA[") {
                self.pos += "<![CDATA[".len();
                let data = self.skip_past("]]>", "CDATA section")?;
                node.text.push_str(data);
            } else if rest.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if rest.starts_with('<') {
                node.children.push(self.parse_element()?);
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                node.text.push_str(&unescape(&rest[..end])?);
                self.pos += end;
            }
        }
    }
}

/// Decode predefined entities and numeric character references
fn unescape(raw: &str) -> Result<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| Error::xml("Unterminated entity reference"))?;
        let entity = &after[..semi];
        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_char_ref(entity)
                .ok_or_else(|| Error::xml(format!("Unknown entity &{entity};")))?,
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse().ok()?
    };
    char::from_u32(code)
}
