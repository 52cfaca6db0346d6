//! Content node types

use super::functions::{ReadMore, ReadRelated, ReadView, ReturnFormat};
use crate::xml::XmlWriter;

/// One gateway function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    ReadView(ReadView),
    ReadRelated(ReadRelated),
    ReadMore(ReadMore),
}

impl Function {
    /// Gateway function name as it appears in the XML
    pub fn name(&self) -> &'static str {
        match self {
            Function::ReadView(_) => "readView",
            Function::ReadRelated(_) => "readRelated",
            Function::ReadMore(_) => "readMore",
        }
    }

    pub fn control_id(&self) -> &str {
        match self {
            Function::ReadView(f) => &f.control_id,
            Function::ReadRelated(f) => &f.control_id,
            Function::ReadMore(f) => &f.control_id,
        }
    }

    /// Format the reply payload is decoded with
    pub fn return_format(&self) -> ReturnFormat {
        match self {
            Function::ReadView(f) => f.return_format,
            Function::ReadRelated(f) => f.return_format,
            Function::ReadMore(f) => f.return_format,
        }
    }

    /// Function with the given control id, else the one at `index`
    ///
    /// Results normally echo the control id they answer; position is the
    /// fallback when they do not.
    pub(crate) fn matching<'a>(
        functions: &'a [Function],
        index: usize,
        control_id: Option<&str>,
    ) -> Option<&'a Function> {
        control_id
            .and_then(|id| functions.iter().find(|f| f.control_id() == id))
            .or_else(|| functions.get(index))
    }

    /// Write `<function controlid="..">...</function>`
    pub fn write_xml(&self, writer: &mut XmlWriter) {
        writer.start_with_attrs("function", &[("controlid", self.control_id())]);
        match self {
            Function::ReadView(f) => f.write_xml(writer),
            Function::ReadRelated(f) => f.write_xml(writer),
            Function::ReadMore(f) => f.write_xml(writer),
        }
        writer.end();
    }
}

impl From<ReadView> for Function {
    fn from(f: ReadView) -> Self {
        Function::ReadView(f)
    }
}

impl From<ReadRelated> for Function {
    fn from(f: ReadRelated) -> Self {
        Function::ReadRelated(f)
    }
}

impl From<ReadMore> for Function {
    fn from(f: ReadMore) -> Self {
        Function::ReadMore(f)
    }
}

/// Ordered list of functions sent in one operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    functions: Vec<Function>,
}

impl Content {
    pub fn new(functions: Vec<Function>) -> Self {
        Self { functions }
    }

    /// Content holding a single function
    pub fn single(function: impl Into<Function>) -> Self {
        Self::new(vec![function.into()])
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Write `<content>` with every function in order
    pub fn write_xml(&self, writer: &mut XmlWriter) {
        writer.start("content");
        for function in &self.functions {
            function.write_xml(writer);
        }
        writer.end();
    }
}
