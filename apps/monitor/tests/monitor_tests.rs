//! End-to-end tests for the monitor against a local mock HTTP server

use std::io::Write;
use std::num::NonZeroU32;
use std::time::Duration;

use serde_json::json;
use uppe_monitor::config::{ConfigError, parse_endpoints};
use uppe_monitor::{
    EndpointSpec, MonitorError, MonitorSettings, MonitoringScheduler, load_endpoints,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> MonitorSettings {
    MonitorSettings::default().with_cycle_pause(Duration::ZERO)
}

async fn run_once(
    settings: &MonitorSettings,
    endpoints: &[EndpointSpec],
) -> (Result<(), MonitorError>, Vec<String>) {
    let mut scheduler = MonitoringScheduler::new(settings, Vec::new()).unwrap();
    let result = scheduler.run(endpoints, NonZeroU32::new(1).unwrap()).await;
    let output = String::from_utf8(scheduler.into_inner()).unwrap();
    (result, output.lines().map(str::to_string).collect())
}

#[tokio::test]
async fn test_fast_success_reports_full_availability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let endpoints = [EndpointSpec::new(format!("{}/health", server.uri()))];
    let (result, output) = run_once(&settings(), &endpoints).await;

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(
        output,
        vec!["Domain 127.0.0.1 has an availability percentage of 100.0% (1/1)", "---"]
    );
}

#[tokio::test]
async fn test_timeout_is_reported_as_error() {
    let server = MockServer::start().await;
    Mock::given(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let url = format!("{}/hang", server.uri());
    let settings = settings().with_probe_timeout(Duration::from_millis(200));
    let (result, output) = run_once(&settings, &[EndpointSpec::new(&url)]).await;

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output.len(), 3, "{output:?}");
    assert!(output[0].starts_with(&format!("{url} (GET) threw an error: ")), "{output:?}");
    assert_eq!(output[1], "Domain 127.0.0.1 has an availability percentage of 0.0% (0/1)");
    assert_eq!(output[2], "---");
}

#[tokio::test]
async fn test_slow_success_counts_toward_total_only() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
        .mount(&server)
        .await;

    let url = format!("{}/slow", server.uri());
    let (result, output) = run_once(&settings(), &[EndpointSpec::new(&url)]).await;

    assert!(result.is_ok(), "{result:?}");
    let prefix = format!("{url} (GET) is a slow endpoint with a latency of ");
    let latency: f64 = output[0]
        .strip_prefix(&prefix)
        .and_then(|rest| rest.strip_suffix(" ms"))
        .and_then(|ms| ms.parse().ok())
        .unwrap_or_else(|| panic!("unexpected slow line: {}", output[0]));
    assert!((600.0..3000.0).contains(&latency), "latency {latency}");
    assert_eq!(output[1], "Domain 127.0.0.1 has an availability percentage of 0.0% (0/1)");
}

#[tokio::test]
async fn test_same_domain_endpoints_are_aggregated() {
    let server = MockServer::start().await;
    Mock::given(path("/ok")).respond_with(ResponseTemplate::new(200)).mount(&server).await;
    Mock::given(path("/broken")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let broken = format!("{}/broken", server.uri());
    let endpoints =
        [EndpointSpec::new(format!("{}/ok", server.uri())), EndpointSpec::new(&broken)];
    let (result, output) = run_once(&settings(), &endpoints).await;

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(
        output,
        vec![
            format!("{broken} (GET) is a down endpoint with a HTTP status code of 500"),
            "Domain 127.0.0.1 has an availability percentage of 50.0% (1/2)".to_string(),
            "---".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_method_headers_and_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("x-api-key", "secret"))
        .and(body_json(json!({ "user": "probe" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = EndpointSpec::new(format!("{}/login", server.uri()))
        .with_method("post")
        .with_header("x-api-key", "secret")
        .with_body(json!({ "user": "probe" }));
    let (result, output) = run_once(&settings(), &[endpoint]).await;

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output[0], "Domain 127.0.0.1 has an availability percentage of 100.0% (1/1)");
}

#[tokio::test]
async fn test_connection_refused_keeps_monitoring() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let server = MockServer::start().await;
    Mock::given(path("/ok")).respond_with(ResponseTemplate::new(204)).mount(&server).await;

    let endpoints = [
        EndpointSpec::new(format!("http://127.0.0.1:{port}/")),
        EndpointSpec::new(format!("{}/ok", server.uri())),
    ];
    let (result, output) = run_once(&settings(), &endpoints).await;

    assert!(result.is_ok(), "{result:?}");
    assert!(output[0].contains("threw an error"), "{output:?}");
    assert_eq!(output[1], "Domain 127.0.0.1 has an availability percentage of 50.0% (1/2)");
}

#[tokio::test]
async fn test_run_from_config_file() {
    let server = MockServer::start().await;
    Mock::given(path("/up")).respond_with(ResponseTemplate::new(200)).mount(&server).await;
    Mock::given(path("/missing")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "- name: up\n  url: {uri}/up\n- name: no url here\n- name: missing\n  url: {uri}/missing\n  method: HEAD\n",
        uri = server.uri()
    )
    .unwrap();

    let endpoints = load_endpoints(file.path()).unwrap();
    let mut scheduler = MonitoringScheduler::new(&settings(), Vec::new()).unwrap();
    scheduler.run(&endpoints, NonZeroU32::new(2).unwrap()).await.unwrap();
    let output = String::from_utf8(scheduler.into_inner()).unwrap();

    let cycle = [
        "Warning: Skipping endpoint no url here because of missing url key in endpoint configuration."
            .to_string(),
        format!(
            "{}/missing (HEAD) is a down endpoint with a HTTP status code of 404",
            server.uri()
        ),
        "Domain 127.0.0.1 has an availability percentage of 50.0% (1/2)".to_string(),
        "---".to_string(),
    ];
    let expected: Vec<String> = cycle.iter().chain(cycle.iter()).cloned().collect();
    assert_eq!(output.lines().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_empty_configuration_is_fatal() {
    let err = parse_endpoints("", "endpoints.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Empty { .. }));

    let (result, output) = run_once(&settings(), &[]).await;
    assert!(matches!(result, Err(MonitorError::EmptyConfig)));
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_config_without_any_url_is_fatal() {
    let endpoints = parse_endpoints("- name: a\n- name: b\n", "endpoints.yaml").unwrap();

    let (result, output) = run_once(&settings(), &endpoints).await;

    assert!(matches!(result, Err(MonitorError::NoEndpointsProcessed)));
    assert_eq!(output.len(), 2);
    assert!(!output.iter().any(|line| line == "---"));
}
