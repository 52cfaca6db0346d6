//! Response types

use crate::error::{Error, Result};
use crate::types::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One error reported by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub error_no: Option<String>,
    pub description: Option<String>,
    pub description2: Option<String>,
    pub correction: Option<String>,
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            &self.error_no,
            &self.description,
            &self.description2,
            &self.correction,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Status of a control block, authentication block or function result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultStatus {
    Success,
    #[default]
    Failure,
    Aborted,
    Other(String),
}

impl ResultStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "success" => ResultStatus::Success,
            "failure" => ResultStatus::Failure,
            "aborted" => ResultStatus::Aborted,
            other => ResultStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ResultStatus::Success => "success",
            ResultStatus::Failure => "failure",
            ResultStatus::Aborted => "aborted",
            ResultStatus::Other(other) => other,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultStatus::Success)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<control>` block echoed back by the gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlBlock {
    pub status: ResultStatus,
    pub sender_id: Option<String>,
    pub control_id: Option<String>,
    pub unique_id: Option<String>,
    pub dtd_version: Option<String>,
}

/// `<authentication>` block of an operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticationBlock {
    pub status: ResultStatus,
    pub user_id: Option<String>,
    pub company_id: Option<String>,
    pub session_timestamp: Option<String>,
}

/// Payload of a function result with its pagination metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultData {
    pub list_type: Option<String>,
    /// Records in this page
    pub count: u64,
    /// Records across all pages
    pub total_count: u64,
    /// Records not yet returned
    pub num_remaining: u64,
    /// Cursor for readMore
    pub result_id: Option<String>,
    pub(crate) records: Vec<Record>,
}

impl ResultData {
    /// Records in server order
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Parsed `<result>` of one function
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    pub status: ResultStatus,
    pub function: Option<String>,
    pub control_id: Option<String>,
    pub data: Option<ResultData>,
    pub errors: Vec<ErrorDescriptor>,
}

impl OperationResult {
    pub fn status(&self) -> &ResultStatus {
        &self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn errors(&self) -> &[ErrorDescriptor] {
        &self.errors
    }

    pub fn data(&self) -> Option<&ResultData> {
        self.data.as_ref()
    }

    /// `totalcount` attribute of the data element (0 when absent)
    pub fn total_count(&self) -> u64 {
        self.data.as_ref().map_or(0, |d| d.total_count)
    }

    /// `numremaining` attribute of the data element (0 when absent)
    pub fn num_remaining(&self) -> u64 {
        self.data.as_ref().map_or(0, |d| d.num_remaining)
    }

    pub fn result_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.result_id.as_deref())
    }

    /// Records of the payload in server order, each flattened into a JSON object
    pub fn data_array(&self) -> Vec<Record> {
        self.data
            .as_ref()
            .map(|d| d.records.clone())
            .unwrap_or_default()
    }

    /// Consume the result and take its records
    pub fn into_records(self) -> Vec<Record> {
        self.data.map(|d| d.records).unwrap_or_default()
    }
}

/// Parsed `<operation>` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub authentication: Option<AuthenticationBlock>,
    pub results: Vec<OperationResult>,
}

impl Operation {
    /// First function result
    pub fn result(&self) -> Result<&OperationResult> {
        self.results
            .first()
            .ok_or_else(|| Error::response("Response operation contains no results", vec![]))
    }

    /// Consume the operation and take its first result
    pub fn into_result(self) -> Result<OperationResult> {
        self.results
            .into_iter()
            .next()
            .ok_or_else(|| Error::response("Response operation contains no results", vec![]))
    }
}

/// Whole gateway response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub control: ControlBlock,
    pub operation: Operation,
}
