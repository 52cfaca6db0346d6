//! XML writer
//!
//! Produces compact XML (no indentation), which is what the gateway expects
//! when `includewhitespace` is false.

/// Escapes a string for use in XML text and attribute values.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Incremental XML writer
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
    open: Vec<String>,
}

impl XmlWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer that starts with an XML declaration
    pub fn with_declaration() -> Self {
        let mut writer = Self::new();
        writer
            .buf
            .push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        writer
    }

    /// Open an element
    pub fn start(&mut self, name: &str) -> &mut Self {
        self.start_with_attrs(name, &[])
    }

    /// Open an element with attributes
    pub fn start_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(name);
        self.push_attrs(attrs);
        self.buf.push('>');
        self.open.push(name.to_string());
        self
    }

    /// Write escaped text inside the current element
    pub fn text(&mut self, value: &str) -> &mut Self {
        self.buf.push_str(&escape_xml(value));
        self
    }

    /// Close the innermost open element
    pub fn end(&mut self) -> &mut Self {
        if let Some(name) = self.open.pop() {
            self.buf.push_str("</");
            self.buf.push_str(&name);
            self.buf.push('>');
        }
        self
    }

    /// Write `<name>value</name>`
    pub fn element(&mut self, name: &str, value: &str) -> &mut Self {
        self.start(name).text(value).end()
    }

    /// Close any open elements and return the document
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.end();
        }
        self.buf
    }

    fn push_attrs(&mut self, attrs: &[(&str, &str)]) {
        for (key, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape_xml(value));
            self.buf.push('"');
        }
    }
}
