//! Response parser
//!
//! Turns gateway XML into [`Response`]. Each `<data>` payload is decoded with
//! the return format of the function it answers: element children for XML,
//! a JSON array or CSV text with a header row.

use super::types::{
    AuthenticationBlock, ControlBlock, ErrorDescriptor, Operation, OperationResult, Response,
    ResultData, ResultStatus,
};
use crate::content::{Content, Function, ReturnFormat};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use crate::xml::XmlNode;
use tracing::debug;

/// Parse the gateway response to `content`
///
/// Fails with [`Error::Response`] when the control or authentication block
/// reports a failure, or when the operation block is missing.
pub fn parse_response(body: &str, content: &Content) -> Result<Response> {
    let root = XmlNode::parse(body)?;
    if root.name != "response" {
        return Err(Error::xml(format!(
            "Expected <response> root element, found <{}>",
            root.name
        )));
    }

    let control_node = root
        .child("control")
        .ok_or_else(|| Error::xml("Response is missing the control element"))?;
    let control = parse_control(control_node);
    if !control.status.is_success() {
        return Err(Error::response(
            format!("Response control status {}", control.status),
            parse_errors(&root),
        ));
    }

    let operation_node = root
        .child("operation")
        .ok_or_else(|| Error::response("Response is missing the operation element", parse_errors(&root)))?;

    let authentication = operation_node.child("authentication").map(|auth| {
        (
            parse_authentication(auth),
            [parse_errors(auth), parse_errors(operation_node)].concat(),
        )
    });
    if let Some((auth, errors)) = &authentication {
        if !auth.status.is_success() {
            return Err(Error::response(
                format!("Response authentication status {}", auth.status),
                errors.clone(),
            ));
        }
    }

    let results = operation_node
        .children_named("result")
        .enumerate()
        .map(|(index, node)| parse_result(node, index, content))
        .collect::<Result<Vec<_>>>()?;
    debug!(results = results.len(), "Parsed gateway response");

    Ok(Response {
        control,
        operation: Operation {
            authentication: authentication.map(|(auth, _)| auth),
            results,
        },
    })
}

fn text_of(node: &XmlNode, name: &str) -> Option<String> {
    node.child_text(name)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

fn status_of(node: &XmlNode) -> ResultStatus {
    node.child_text("status")
        .map(ResultStatus::parse)
        .unwrap_or_default()
}

fn parse_control(node: &XmlNode) -> ControlBlock {
    ControlBlock {
        status: status_of(node),
        sender_id: text_of(node, "senderid"),
        control_id: text_of(node, "controlid"),
        unique_id: text_of(node, "uniqueid"),
        dtd_version: text_of(node, "dtdversion"),
    }
}

fn parse_authentication(node: &XmlNode) -> AuthenticationBlock {
    AuthenticationBlock {
        status: status_of(node),
        user_id: text_of(node, "userid"),
        company_id: text_of(node, "companyid"),
        session_timestamp: text_of(node, "sessiontimestamp"),
    }
}

/// Errors from the `<errormessage>` child of `node`
fn parse_errors(node: &XmlNode) -> Vec<ErrorDescriptor> {
    node.children_named("errormessage")
        .flat_map(|message| message.children_named("error"))
        .map(|error| ErrorDescriptor {
            error_no: text_of(error, "errorno"),
            description: text_of(error, "description"),
            description2: text_of(error, "description2"),
            correction: text_of(error, "correction"),
        })
        .collect()
}

fn parse_result(node: &XmlNode, index: usize, content: &Content) -> Result<OperationResult> {
    let control_id = text_of(node, "controlid");
    let format = Function::matching(content.functions(), index, control_id.as_deref())
        .map_or(ReturnFormat::Xml, Function::return_format);
    let data = node
        .child("data")
        .map(|data| parse_data(data, format))
        .transpose()?;

    Ok(OperationResult {
        status: status_of(node),
        function: text_of(node, "function"),
        control_id,
        data,
        errors: parse_errors(node),
    })
}

fn count_attribute(node: &XmlNode, name: &str) -> Result<u64> {
    match node.attribute(name).map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::xml(format!("Data attribute {name}='{raw}' is not a count"))),
    }
}

fn parse_data(node: &XmlNode, format: ReturnFormat) -> Result<ResultData> {
    Ok(ResultData {
        list_type: node.attribute("listtype").map(String::from),
        count: count_attribute(node, "count")?,
        total_count: count_attribute(node, "totalcount")?,
        num_remaining: count_attribute(node, "numremaining")?,
        result_id: node
            .attribute("resultId")
            .filter(|id| !id.trim().is_empty())
            .map(String::from),
        records: decode_records(node, format)?,
    })
}

fn decode_records(node: &XmlNode, format: ReturnFormat) -> Result<Vec<Record>> {
    match format {
        ReturnFormat::Xml => Ok(node.children.iter().map(XmlNode::to_record).collect()),
        ReturnFormat::Json => decode_json_records(node.text.trim()),
        ReturnFormat::Csv => decode_csv_records(&node.text),
    }
}

fn decode_json_records(payload: &str) -> Result<Vec<Record>> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    let value: JsonValue = serde_json::from_str(payload)?;
    let items = match value {
        JsonValue::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| match item {
            JsonValue::Object(record) => Ok(record),
            other => Err(Error::xml(format!(
                "JSON payload item is not an object: {other}"
            ))),
        })
        .collect()
}

/// Header row plus records; quoted fields may span lines
fn decode_csv_records(payload: &str) -> Result<Vec<Record>> {
    let payload = payload.trim_matches(|c| c == '\r' || c == '\n');
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload.as_bytes());
    let headers = reader.headers()?.clone();

    reader
        .records()
        .map(|row| -> Result<Record> {
            let row = row?;
            Ok(headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).unwrap_or_default();
                    (name.to_string(), JsonValue::String(value.to_string()))
                })
                .collect())
        })
        .collect()
}
