//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: caller params → request envelope → mock
//! gateway → parsed results → records

use clap::Parser;
use intacct_sdk::cli::{Cli, Runner};
use intacct_sdk::config::RateLimitConfig;
use intacct_sdk::{ClientConfig, CustomObjects, Error, IntacctClient, Params};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GATEWAY_PATH: &str = "/ia/xml/xmlgw.phtml";

fn client_for(server: &MockServer) -> IntacctClient {
    let config = ClientConfig {
        endpoint_url: format!("{}{GATEWAY_PATH}", server.uri()),
        sender_id: Some("testsender".into()),
        sender_password: Some("pass123!".into()),
        session_id: Some("testsession..".into()),
        max_retries: 0,
        ..Default::default()
    };
    assert_ok!(IntacctClient::connect(config))
}

fn customer(id: &str) -> String {
    format!("<customer><CUSTOMERID>{id}</CUSTOMERID><NAME>Customer {id}</NAME></customer>")
}

fn success_body(function: &str, attrs: &str, records: &[&str]) -> String {
    let records: String = records.iter().map(|id| customer(id)).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
    <control><status>success</status><senderid>testsender</senderid><controlid>requestControlId</controlid></control>
    <operation>
        <authentication><status>success</status><userid>api_user</userid><companyid>acme</companyid></authentication>
        <result>
            <status>success</status>
            <function>{function}</function>
            <controlid>func1</controlid>
            <data {attrs}>{records}</data>
        </result>
    </operation>
</response>"#
    )
}

fn failure_body(function: &str, error_no: &str, description: &str) -> String {
    format!(
        r#"<response>
    <control><status>success</status></control>
    <operation>
        <authentication><status>success</status></authentication>
        <result>
            <status>failure</status>
            <function>{function}</function>
            <controlid>func1</controlid>
            <errormessage>
                <error><errorno>{error_no}</errorno><description></description><description2>{description}</description2><correction></correction></error>
            </errormessage>
        </result>
    </operation>
</response>"#
    )
}

async fn mount_view_pages(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(GATEWAY_PATH))
        .and(header("content-type", "x-intacct-xml-request"))
        .and(body_string_contains("<readView><view>CUSTOMER#10</view><pagesize>2</pagesize>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(
            "readView",
            r#"listtype="view" count="2" totalcount="5" numremaining="3" resultId="7765623ZAo67""#,
            &["C-1", "C-2"],
        )))
        .expect(1)
        .mount(server)
        .await;

    for (remaining, ids) in [("1", vec!["C-3", "C-4"]), ("0", vec!["C-5"])] {
        let attrs = format!(
            r#"listtype="view" count="{}" totalcount="5" numremaining="{remaining}" resultId="7765623ZAo67""#,
            ids.len()
        );
        Mock::given(method("POST"))
            .and(path(GATEWAY_PATH))
            .and(body_string_contains("<readMore><resultId>7765623ZAo67</resultId></readMore>"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(success_body("readMore", &attrs, &ids)),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(server)
            .await;
    }
}

// ============================================================================
// View Read Tests
// ============================================================================

#[tokio::test]
async fn test_read_view_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GATEWAY_PATH))
        .and(body_string_contains("<sessionid>testsession..</sessionid>"))
        .and(body_string_contains(r#"<function controlid="func1"><readView>"#))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(
            "readView",
            r#"listtype="view" count="2" totalcount="2" numremaining="0""#,
            &["C-1", "C-2"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let objects = CustomObjects::new();
    let params = Params::new()
        .with("view", "CUSTOMER#10")
        .with("control_id", "func1");
    let result = assert_ok!(objects.read_view(&params, &client_for(&server)).await);

    assert!(result.is_success());
    assert_eq!(result.total_count(), 2);
    assert_eq!(result.num_remaining(), 0);

    let records = result.data_array();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["CUSTOMERID"], "C-1");
    assert_eq!(records[1]["NAME"], "Customer C-2");
}

#[tokio::test]
async fn test_get_view_records_walks_all_pages() {
    let server = MockServer::start().await;
    mount_view_pages(&server).await;

    let objects = CustomObjects::new();
    let params = Params::new().with("view", "CUSTOMER#10").with("page_size", 2);
    let records = assert_ok!(objects.get_view_records(&params, &client_for(&server)).await);

    let ids: Vec<&str> = records
        .iter()
        .filter_map(|r| r["CUSTOMERID"].as_str())
        .collect();
    assert_eq!(ids, vec!["C-1", "C-2", "C-3", "C-4", "C-5"]);
}

#[tokio::test]
async fn test_get_view_records_rate_limited_across_pages() {
    let server = MockServer::start().await;
    mount_view_pages(&server).await;

    let mut config = client_for(&server).config().clone();
    config.rate_limit = Some(RateLimitConfig {
        requests_per_second: 1,
        burst_size: 1,
    });
    let client = assert_ok!(IntacctClient::connect(config));

    let objects = CustomObjects::new();
    let params = Params::new().with("view", "CUSTOMER#10").with("page_size", 2);

    let start = Instant::now();
    let records = assert_ok!(objects.get_view_records(&params, &client).await);

    assert_eq!(records.len(), 5);
    // three requests at one per second
    assert!(start.elapsed() >= Duration::from_millis(1900));
}

#[tokio::test]
async fn test_get_view_records_limit_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("<readView>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(
            "readView",
            r#"listtype="view" count="2" totalcount="5" numremaining="3" resultId="abc""#,
            &["C-1", "C-2"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("<readMore>"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let objects = CustomObjects::new();
    let params = Params::new()
        .with("view", "CUSTOMER#10")
        .with("max_total_count", 4);
    let err = assert_err!(objects.get_view_records(&params, &client_for(&server)).await);

    assert!(matches!(err, Error::LimitExceeded { max_total_count: 4 }));
    assert_eq!(
        err.to_string(),
        "Query result totalcount exceeds max_total_count parameter of 4"
    );
}

#[tokio::test]
async fn test_get_view_records_read_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(failure_body(
            "readView",
            "BL01001973",
            "View CUSTOMER#99 does not exist",
        )))
        .mount(&server)
        .await;

    let objects = CustomObjects::new();
    let params = Params::new().with("view", "CUSTOMER#99");
    let err = assert_err!(objects.get_view_records(&params, &client_for(&server)).await);

    assert!(matches!(err, Error::Read { .. }));
    assert_eq!(
        err.to_string(),
        "An error occurred trying to read view records: BL01001973 View CUSTOMER#99 does not exist"
    );
    assert_eq!(err.errors().len(), 1);
}

// ============================================================================
// Related Read Tests
// ============================================================================

#[tokio::test]
async fn test_read_related_objects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GATEWAY_PATH))
        .and(body_string_contains(
            "<readRelated><object>CUSTOMER</object><keys>1,2</keys><relation>Rcustomer_vendor</relation>",
        ))
        .and(body_string_contains("<fields>RECORDNO,NAME</fields>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_body(
            "readRelated",
            r#"listtype="vendor" count="1""#,
            &["V-1"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    // transport settings are taken from the caller for related reads
    let params = Params::new()
        .with("endpoint_url", client.config().endpoint_url.as_str())
        .with("max_retries", 0)
        .with("object", "CUSTOMER")
        .with("relation", "Rcustomer_vendor")
        .with("keys", vec!["1", "2"])
        .with("fields", "RECORDNO,NAME");

    let objects = CustomObjects::new();
    let result = assert_ok!(objects.read_related_objects(&params, &client).await);

    assert_eq!(result.function.as_deref(), Some("readRelated"));
    assert_eq!(result.data_array()[0]["CUSTOMERID"], "V-1");
}

// ============================================================================
// CLI Tests
// ============================================================================

#[tokio::test]
async fn test_cli_view_records_prints_json_lines() {
    let server = MockServer::start().await;
    mount_view_pages(&server).await;

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        "endpoint_url: {}{GATEWAY_PATH}\nsender_id: testsender\nsender_password: pass123!\nsession_id: testsession..\nmax_retries: 0\n",
        server.uri()
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "intacct",
        "-C",
        config_file.path().to_str().unwrap(),
        "view-records",
        "--view",
        "CUSTOMER#10",
        "--page-size",
        "2",
    ])
    .unwrap();

    let mut out = Vec::new();
    assert_ok!(Runner::new(cli).run_with_writer(&mut out).await);

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["CUSTOMERID"], "C-1");
    assert_eq!(lines[4]["NAME"], "Customer C-5");
}

#[tokio::test]
async fn test_cli_missing_config_file() {
    let cli = Cli::try_parse_from([
        "intacct",
        "-C",
        "/nonexistent/intacct.yaml",
        "read-view",
        "--view",
        "CUSTOMER#10",
    ])
    .unwrap();

    let mut out = Vec::new();
    let err = assert_err!(Runner::new(cli).run_with_writer(&mut out).await);
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(out.is_empty());
}
