//! Library-level tests against an in-process mock of the layout-parsing service.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{page_entries, MockService};
use layout_probe::{
    probe, ClientConfig, ImageKind, InputOrigin, InputSource, LayoutClient, LayoutError,
    LayoutRequest, FileType, ProbeProgressCallback, FULL_RESPONSE_FILE,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn config_for(mock: &MockService) -> ClientConfig {
    ClientConfig::builder()
        .host(mock.host())
        .timeout_secs(10)
        .build()
        .expect("valid config")
}

fn success_body() -> Value {
    json!({
        "logId": "9f1c-layout",
        "errorCode": 0,
        "errorMsg": "Success",
        "result": {
            "layoutParsingResults": [{
                "prunedResult": {
                    "page_count": 1,
                    "parsing_res_list": [{"block_label": "text", "block_content": "Grüße, 世界"}]
                },
                "markdown": {
                    "text": "# Demo\n\n![](imgs/img_in_image_box_1.jpg)\n\nGrüße, 世界",
                    "images": {"imgs/img_in_image_box_1.jpg": STANDARD.encode(b"\xff\xd8embedded")}
                },
                "outputImages": {"vis1": STANDARD.encode(b"\xff\xd8visual")}
            }],
            "dataInfo": {"width": 1024, "height": 768, "type": "image"}
        }
    })
}

/// Records every event name in order.
#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    fn push(&self, e: impl Into<String>) {
        self.0.lock().unwrap().push(e.into());
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ProbeProgressCallback for EventLog {
    fn on_input_ready(&self, _origin: &InputOrigin) {
        self.push("input");
    }
    fn on_request_start(&self, _url: &str) {
        self.push("request");
    }
    fn on_response_status(&self, status: u16) {
        self.push(format!("status {status}"));
    }
    fn on_response_envelope(&self, log_id: &str, error_code: i64) {
        self.push(format!("envelope {log_id} {error_code}"));
    }
    fn on_pages_found(&self, total_pages: usize) {
        self.push(format!("pages {total_pages}"));
    }
    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.push(format!("page {page_num}"));
    }
    fn on_markdown_saved(&self, _path: &Path, _preview: &str, _total_chars: usize) {
        self.push("markdown");
    }
    fn on_image_group(&self, kind: ImageKind, count: usize) {
        self.push(format!("{kind:?} {count}"));
    }
    fn on_artifact_written(&self, _path: &Path) {
        self.push("image");
    }
    fn on_structure_saved(&self, _path: &Path) {
        self.push("structure");
    }
    fn on_full_response_saved(&self, _path: &Path) {
        self.push("full");
    }
    fn on_complete(&self, _output_dir: &Path) {
        self.push("complete");
    }
}

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn success_writes_every_artifact() {
    let body = success_body();
    let mock = MockService::ok(&body).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("api_output");

    let source = InputSource::Url("https://example.com/page.png".into());
    let outcome = probe(&source, &out, &config_for(&mock)).await.unwrap();

    assert_eq!(outcome.log_id, "9f1c-layout");
    assert_eq!(outcome.summary.pages, 1);
    assert_eq!(
        page_entries(&out),
        vec![
            "page_0_imgs",
            "page_0_result.md",
            "page_0_structure.json",
            "page_0_vis1.jpg",
        ]
    );
    assert_eq!(
        std::fs::read(out.join("page_0_imgs/img_in_image_box_1.jpg")).unwrap(),
        b"\xff\xd8embedded"
    );
    assert_eq!(
        std::fs::read(out.join("page_0_vis1.jpg")).unwrap(),
        b"\xff\xd8visual"
    );
    assert!(std::fs::read_to_string(out.join("page_0_result.md"))
        .unwrap()
        .ends_with("Grüße, 世界"));

    let structure = std::fs::read_to_string(out.join("page_0_structure.json")).unwrap();
    assert!(structure.contains("\"block_content\": \"Grüße, 世界\""), "got {structure}");
}

#[tokio::test]
async fn full_response_round_trips_the_mocked_body() {
    let body = success_body();
    let mock = MockService::ok(&body).await;
    let dir = tempfile::tempdir().unwrap();

    probe(&InputSource::Demo, dir.path(), &config_for(&mock))
        .await
        .unwrap();

    let written = std::fs::read_to_string(dir.path().join(FULL_RESPONSE_FILE)).unwrap();
    let reread: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(reread, body);
    // Same key order and two-space indentation as the mocked body.
    assert_eq!(written, serde_json::to_string_pretty(&body).unwrap());
}

#[tokio::test]
async fn url_request_payload_matches_wire_format() {
    let mock = MockService::ok(&success_body()).await;
    let dir = tempfile::tempdir().unwrap();

    probe(
        &InputSource::Url("https://example.com/page.png".into()),
        dir.path(),
        &config_for(&mock),
    )
    .await
    .unwrap();

    assert_eq!(mock.hits(), 1);
    assert_eq!(
        mock.last_request().unwrap(),
        json!({"file": "https://example.com/page.png", "fileType": 1, "visualize": true})
    );
}

#[tokio::test]
async fn local_pdf_is_sent_inline_with_file_type_zero() {
    let mock = MockService::ok(&success_body()).await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("report.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake").unwrap();

    let outcome = probe(
        &InputSource::LocalFile(pdf.clone()),
        dir.path().join("out"),
        &config_for(&mock),
    )
    .await
    .unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(request["fileType"], 0);
    assert_eq!(request["file"], STANDARD.encode(b"%PDF-1.4 fake"));
    assert!(matches!(
        outcome.input,
        InputOrigin::Local { size_bytes: 13, .. }
    ));
}

#[tokio::test]
async fn events_arrive_in_pipeline_order() {
    let mock = MockService::ok(&success_body()).await;
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(EventLog::default());
    let config = ClientConfig::builder()
        .host(mock.host())
        .progress_callback(log.clone())
        .build()
        .unwrap();

    probe(&InputSource::Demo, dir.path(), &config).await.unwrap();

    assert_eq!(
        log.events(),
        vec![
            "input",
            "request",
            "status 200",
            "envelope 9f1c-layout 0",
            "pages 1",
            "page 1",
            "markdown",
            "Markdown 1",
            "image",
            "Visualization 1",
            "image",
            "structure",
            "full",
            "complete",
        ]
    );
}

#[tokio::test]
async fn success_without_results_still_writes_full_response() {
    let body = json!({"errorCode": 0, "errorMsg": "Success", "logId": "x"});
    let mock = MockService::ok(&body).await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = probe(&InputSource::Demo, dir.path(), &config_for(&mock))
        .await
        .unwrap();

    assert_eq!(outcome.summary.pages, 0);
    assert!(page_entries(dir.path()).is_empty());
    assert!(dir.path().join(FULL_RESPONSE_FILE).exists());
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn oversized_integers_keep_every_digit() {
    let body = r#"{"errorCode":0,"errorMsg":"Success","logId":"big","result":{"layoutParsingResults":[],"blockId":123456789012345678901234567890,"score":0.10000000000000000001}}"#;
    let mock = MockService::start(200, body).await;
    let dir = tempfile::tempdir().unwrap();

    probe(&InputSource::Demo, dir.path(), &config_for(&mock))
        .await
        .unwrap();

    let saved = std::fs::read_to_string(dir.path().join(FULL_RESPONSE_FILE)).unwrap();
    assert!(saved.contains("\"blockId\": 123456789012345678901234567890"), "{saved}");
    assert!(saved.contains("\"score\": 0.10000000000000000001"), "{saved}");
}

#[tokio::test]
async fn application_error_writes_nothing() {
    let body = json!({"errorCode": 17, "errorMsg": "Unsupported image", "logId": "err-17"});
    let mock = MockService::ok(&body).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("api_output");

    let err = probe(&InputSource::Demo, &out, &config_for(&mock))
        .await
        .unwrap_err();

    match err {
        LayoutError::Api {
            code,
            message,
            log_id,
        } => {
            assert_eq!(code, 17);
            assert_eq!(message, "Unsupported image");
            assert_eq!(log_id, "err-17");
        }
        other => panic!("expected Api error, got {other}"),
    }
    assert!(!out.exists(), "no output directory should be created");
}

#[tokio::test]
async fn missing_error_code_is_treated_as_failure() {
    let body = json!({"result": {"layoutParsingResults": []}});
    let mock = MockService::ok(&body).await;
    let client = LayoutClient::new(config_for(&mock)).unwrap();

    let request = LayoutRequest {
        file: "https://example.com/a.png".into(),
        file_type: FileType::Image,
        visualize: true,
    };
    let err = client.call(&request).await.unwrap_err();

    assert!(
        matches!(err, LayoutError::Api { code: -1, ref log_id, .. } if log_id == "N/A"),
        "got {err}"
    );
}

#[tokio::test]
async fn non_200_status_reports_raw_body() {
    let mock = MockService::start(500, "{\"detail\":\"model not loaded\"}").await;
    let dir = tempfile::tempdir().unwrap();

    let err = probe(&InputSource::Demo, dir.path().join("out"), &config_for(&mock))
        .await
        .unwrap_err();

    match err {
        LayoutError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "{\"detail\":\"model not loaded\"}");
        }
        other => panic!("expected HttpStatus, got {other}"),
    }
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let mock = MockService::start(200, "<html>proxy error</html>").await;
    let dir = tempfile::tempdir().unwrap();

    let err = probe(&InputSource::Demo, dir.path(), &config_for(&mock))
        .await
        .unwrap_err();

    assert!(matches!(err, LayoutError::InvalidResponse(_)), "got {err}");
}

#[tokio::test]
async fn missing_local_file_never_reaches_the_service() {
    let mock = MockService::ok(&success_body()).await;
    let dir = tempfile::tempdir().unwrap();

    let err = probe(
        &InputSource::LocalFile(dir.path().join("missing.png")),
        dir.path().join("out"),
        &config_for(&mock),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LayoutError::FileNotFound { .. }), "got {err}");
    assert_eq!(mock.hits(), 0);
}
