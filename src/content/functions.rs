//! Gateway function definitions
//!
//! Each function reads its options from a parameter set. Unknown keys are
//! ignored so that a merged session + caller configuration can be passed
//! straight through.

use crate::error::{Error, Result};
use crate::types::Params;
use crate::xml::XmlWriter;
use serde::{Deserialize, Serialize};

/// Default number of records per page for view reads
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Largest page size the gateway accepts
const MAX_PAGE_SIZE: u64 = 1000;

/// Payload format requested from the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    /// XML records inside the `<data>` element (default)
    #[default]
    Xml,
    /// JSON array inside the `<data>` element
    Json,
    /// CSV text inside the `<data>` element
    Csv,
}

impl ReturnFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnFormat::Xml => "xml",
            ReturnFormat::Json => "json",
            ReturnFormat::Csv => "csv",
        }
    }

    /// Read `return_format` from params, defaulting to XML
    fn from_params(params: &Params) -> Result<Self> {
        match params.get_str("return_format")? {
            None => Ok(Self::default()),
            Some(value) => match value.to_lowercase().as_str() {
                "xml" => Ok(ReturnFormat::Xml),
                "json" => Ok(ReturnFormat::Json),
                "csv" => Ok(ReturnFormat::Csv),
                _ => Err(Error::invalid_value(
                    "return_format",
                    format!("'{value}' is not one of xml, json, csv"),
                )),
            },
        }
    }
}

/// Control id from params, or a fresh random one
fn control_id_from(params: &Params) -> Result<String> {
    Ok(params
        .get_str("control_id")?
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()))
}

// ============================================================================
// readView
// ============================================================================

/// Reads one page of records from a custom view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadView {
    pub control_id: String,
    pub view: String,
    pub page_size: u64,
    pub return_format: ReturnFormat,
}

impl ReadView {
    /// Build from `view` (required), `page_size`, `return_format`, `control_id`
    pub fn from_params(params: &Params) -> Result<Self> {
        let view = params.require_str("view")?;
        let page_size = params.get_u64("page_size")?.unwrap_or(DEFAULT_PAGE_SIZE);
        validate_page_size(page_size)?;

        Ok(Self {
            control_id: control_id_from(params)?,
            view,
            page_size,
            return_format: ReturnFormat::from_params(params)?,
        })
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) {
        writer
            .start("readView")
            .element("view", &self.view)
            .element("pagesize", &self.page_size.to_string())
            .element("returnFormat", self.return_format.as_str())
            .end();
    }
}

fn validate_page_size(page_size: u64) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_value(
            "page_size",
            "page size cannot be less than 1",
        ));
    }
    if page_size > MAX_PAGE_SIZE {
        return Err(Error::invalid_value(
            "page_size",
            format!("page size cannot be greater than {MAX_PAGE_SIZE}"),
        ));
    }
    Ok(())
}

// ============================================================================
// readRelated
// ============================================================================

/// Reads records related to a set of object keys through a named relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRelated {
    pub control_id: String,
    pub object: String,
    pub relation: String,
    pub keys: Vec<String>,
    pub fields: Vec<String>,
    pub return_format: ReturnFormat,
}

impl ReadRelated {
    /// Build from `object`, `relation` (required), `keys`, `fields`,
    /// `return_format`, `control_id`
    pub fn from_params(params: &Params) -> Result<Self> {
        let object = params.require_str("object")?;
        let relation = params.require_str("relation")?;

        Ok(Self {
            control_id: control_id_from(params)?,
            object,
            relation,
            keys: params.get_list("keys")?.unwrap_or_default(),
            fields: params.get_list("fields")?.unwrap_or_default(),
            return_format: ReturnFormat::from_params(params)?,
        })
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) {
        let fields = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(",")
        };

        writer
            .start("readRelated")
            .element("object", &self.object)
            .element("keys", &self.keys.join(","))
            .element("relation", &self.relation)
            .element("fields", &fields)
            .element("returnFormat", self.return_format.as_str())
            .end();
    }
}

// ============================================================================
// readMore
// ============================================================================

/// What a readMore continues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadMoreTarget {
    /// A previous result identified by its `resultId`
    ResultId(String),
    /// The last read of a view in this session
    View(String),
    /// The last read of an object in this session
    Object(String),
}

/// Fetches the next page of an earlier read
///
/// The gateway answers in the format of the read being continued, so
/// `return_format` is only used to decode the reply and is not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMore {
    pub control_id: String,
    pub target: ReadMoreTarget,
    pub return_format: ReturnFormat,
}

impl ReadMore {
    /// Build from `result_id`, falling back to `view` then `object`, plus
    /// `return_format` and `control_id`
    pub fn from_params(params: &Params) -> Result<Self> {
        let target = if let Some(id) = non_empty(params.get_str("result_id")?) {
            ReadMoreTarget::ResultId(id)
        } else if let Some(view) = non_empty(params.get_str("view")?) {
            ReadMoreTarget::View(view)
        } else if let Some(object) = non_empty(params.get_str("object")?) {
            ReadMoreTarget::Object(object)
        } else {
            return Err(Error::missing_field("result_id"));
        };

        Ok(Self {
            control_id: control_id_from(params)?,
            target,
            return_format: ReturnFormat::from_params(params)?,
        })
    }

    pub(crate) fn write_xml(&self, writer: &mut XmlWriter) {
        let (name, value) = match &self.target {
            ReadMoreTarget::ResultId(id) => ("resultId", id),
            ReadMoreTarget::View(view) => ("view", view),
            ReadMoreTarget::Object(object) => ("object", object),
        };
        writer.start("readMore").element(name, value).end();
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
