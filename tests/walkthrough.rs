use regex::Regex;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use l2l_dispatch::walkthrough::{self, Reporter, WalkthroughOptions};
use l2l_dispatch::{ApiKey, DispatchClient, DispatchError};

#[derive(Default)]
struct Recorder {
    steps: Vec<(String, Value)>,
}

impl Reporter for Recorder {
    fn step(&mut self, message: &str, payload: &Value) {
        self.steps.push((message.to_string(), payload.clone()));
    }
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data}))
}

/// Form encoded `YYYY-MM-DD HH:MM`.
const MINUTES: &str = r"\d{4}-\d{2}-\d{2}\+\d{2}%3A\d{2}";
/// Form encoded `YYYY-MM-DD HH:MM:SS`.
const SECONDS: &str = r"\d{4}-\d{2}-\d{2}\+\d{2}%3A\d{2}%3A\d{2}";

/// Matches a form body field whose whole value fits `value_pattern`.
fn form_field(name: &str, value_pattern: &str) -> impl Match {
    let field = Regex::new(&format!("(^|&){}={}(&|$)", name, value_pattern)).unwrap();
    move |request: &Request| field.is_match(&String::from_utf8_lossy(&request.body))
}

fn without_field(name: &'static str) -> impl Match {
    move |request: &Request| {
        !String::from_utf8_lossy(&request.body)
            .split('&')
            .any(|pair| pair.starts_with(&format!("{}=", name)))
    }
}

fn client_for(server: &MockServer) -> DispatchClient {
    DispatchClient::builder()
        .base_url(Url::parse(&format!("{}/api/1.0/", server.uri())).unwrap())
        .api_key(ApiKey::new("walk-key"))
        .build()
        .unwrap()
}

async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/1.0/sites/"))
        .and(query_param("site", "11"))
        .respond_with(ok(json!([{"id": 11, "description": "Sandbox"}])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/areas/"))
        .and(query_param("offset", "0"))
        .and(query_param("site", "11"))
        .respond_with(ok(json!([{"id": 1, "code": "AREA-1"}, {"id": 2, "code": "AREA-2"}])))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/areas/"))
        .and(query_param("offset", "2"))
        .respond_with(ok(json!([{"id": 3, "code": "AREA-3"}])))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/lines/"))
        .and(query_param("area_id", "3"))
        .and(query_param("enable_production", "True"))
        .respond_with(ok(json!([{"id": 30, "code": "LINE-30"}, {"id": 31, "code": "LINE-31"}])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/machines/"))
        .and(query_param("line_id", "30"))
        .respond_with(ok(json!([{"id": 300, "code": "MACH-300"}])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/dispatchtypes/"))
        .respond_with(ok(json!([{"id": 9, "code": "MAINT"}])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_walkthrough() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/1.0/users/clock_in/operator/"))
        .and(body_string_contains("linecode=LINE-30"))
        .and(without_field("start"))
        .and(without_field("end"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/users/clock_in/operator/"))
        .and(body_string_contains("linecode=LINE-30"))
        .and(form_field("start", MINUTES))
        .and(form_field("end", MINUTES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/users/clock_out/operator/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/machines/set_cycle_count/"))
        .and(body_string_contains("code=MACH-300"))
        .and(body_string_contains("cyclecount=832"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/machines/increment_cycle_count/"))
        .and(body_string_contains("skip_lastupdated=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/dispatches/open/"))
        .and(body_string_contains("dispatchtype=9"))
        .and(body_string_contains("machine=300"))
        .respond_with(ok(json!({"id": 555, "open": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/dispatches/close/555/"))
        .respond_with(ok(json!({"id": 555, "open": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/dispatches/add/"))
        .and(body_string_contains("dispatchtypecode=MAINT"))
        .and(body_string_contains("machinecode=MACH-300"))
        .and(form_field("reported", SECONDS))
        .and(form_field("completed", SECONDS))
        .respond_with(ok(json!({"status": "recorded"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/pitchdetails/record_details/"))
        .and(body_string_contains("start=now"))
        .and(body_string_contains("productcode=testproduct-"))
        .respond_with(ok(json!({"pitch_id": 77})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/reporting/production/daily_summary_data_by_line/"))
        .and(query_param("linecode", "LINE-30"))
        .and(query_param("show_products", "True"))
        .respond_with(ok(json!({"actual": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let mut recorder = Recorder::default();
    let picked = walkthrough::run(
        client_for(&server),
        &WalkthroughOptions {
            site: 11,
            user: "operator".to_string(),
        },
        &mut recorder,
    )
    .await
    .unwrap();

    assert_eq!(picked.site.description, "Sandbox");
    assert_eq!(picked.area.code, "AREA-3");
    assert_eq!(picked.line.code, "LINE-30");
    assert_eq!(picked.machine.id, 300);
    assert_eq!(picked.dispatch_type.code, "MAINT");

    let messages: Vec<&str> = recorder.steps.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Using site: Sandbox",
            "Using area: AREA-3",
            "Using line: LINE-30",
            "Using machine: MACH-300",
            "Using Dispatch Type: MAINT",
            "User clocked in",
            "User clocked out",
            "Created backdated clock in",
            "Set machine cycle count",
            "Incremented machine cycle count",
            "Created open Dispatch",
            "Closed open Dispatch",
            "Created backdated Dispatch",
            "Recorded Pitch details",
            "Retrieved Daily summary for line",
        ]
    );
    assert_eq!(recorder.steps[11].1, json!({"id": 555, "open": false}));
    assert_eq!(recorder.steps[12].1, json!({"status": "recorded"}));
    assert_eq!(recorder.steps[14].1, json!({"actual": 42}));
}

#[tokio::test]
async fn walkthrough_aborts_on_first_failure() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/1.0/users/clock_in/operator/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "User not found"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1.0/users/clock_out/operator/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let mut recorder = Recorder::default();
    let err = walkthrough::run(
        client_for(&server),
        &WalkthroughOptions {
            site: 11,
            user: "operator".to_string(),
        },
        &mut recorder,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DispatchError::ApplicationFailure { ref message } if message == "User not found"));
    assert_eq!(recorder.steps.len(), 5);
}

#[tokio::test]
async fn walkthrough_needs_an_active_area() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/sites/"))
        .respond_with(ok(json!([{"id": 11, "description": "Sandbox"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/areas/"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut recorder = Recorder::default();
    let err = walkthrough::run(
        client_for(&server),
        &WalkthroughOptions {
            site: 11,
            user: "operator".to_string(),
        },
        &mut recorder,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DispatchError::NotFound { .. }));
    assert_eq!(recorder.steps.len(), 1);
}
