// Health checks against a mock local application
//
// Run with: cargo test --test health_test

use std::time::Duration;
use steve_probe::config::HealthSettings;
use steve_probe::health::{HealthChecker, HealthStatus, Monitor};
use steve_probe::providers::GeminiTarget;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(url: String, markers: &[&str]) -> HealthSettings {
    HealthSettings {
        url,
        markers: markers.iter().map(|m| m.to_string()).collect(),
        timeout: Duration::from_secs(5),
        interval: Duration::from_millis(20),
    }
}

async fn app_serving(page: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_app_healthy_with_markers() {
    let server = app_serving("<html><title>Steve</title><div id=\"root\"></div></html>").await;
    let checker = HealthChecker::new(settings(format!("{}/", server.uri()), &["Steve", "root"]));

    let report = checker.check_app().await;

    assert_eq!(report.status, HealthStatus::Healthy);
    assert!(report.is_healthy());
}

#[tokio::test]
async fn test_app_wrong_application() {
    let server = app_serving("<html><title>Some other dev server</title></html>").await;
    let checker = HealthChecker::new(settings(format!("{}/", server.uri()), &["Steve", "html"]));

    let report = checker.check_app().await;

    assert_eq!(
        report.status,
        HealthStatus::WrongApplication {
            missing: vec!["Steve".to_string()]
        }
    );
}

#[tokio::test]
async fn test_app_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let checker = HealthChecker::new(settings(server.uri(), &[]));

    assert_eq!(checker.check_app().await.status, HealthStatus::HttpError(502));
}

#[tokio::test]
async fn test_app_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let checker = HealthChecker::new(settings(format!("http://127.0.0.1:{}/", port), &[]));

    assert!(matches!(
        checker.check_app().await.status,
        HealthStatus::Unreachable(_)
    ));
}

#[tokio::test]
async fn test_gemini_check_only_when_configured() {
    let app = app_serving("ok").await;
    let gemini = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&gemini)
        .await;

    let without = HealthChecker::new(settings(app.uri(), &[]));
    assert!(without.check_gemini().await.is_none());
    assert_eq!(without.check_all().await.len(), 1);

    let with = HealthChecker::new(settings(app.uri(), &[]))
        .with_gemini(GeminiTarget::new("k").with_api_base(gemini.uri()));
    let report = with.check_gemini().await.unwrap();
    assert_eq!(report.status, HealthStatus::RateLimited);
}

#[tokio::test]
async fn test_monitor_rounds_until_shutdown() {
    let app = app_serving("Steve").await;
    let mut monitor = Monitor::new(HealthChecker::new(settings(app.uri(), &["Steve"])));

    assert!(monitor.run_once().await);
    assert_eq!(monitor.rounds(), 1);

    monitor
        .run_until(
            Duration::from_millis(20),
            tokio::time::sleep(Duration::from_millis(150)),
        )
        .await;

    assert!(monitor.rounds() >= 3);
}

#[tokio::test]
async fn test_unreachable_gemini_hides_key() {
    let app = app_serving("ok").await;
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            drop(stream);
        }
    });

    let checker = HealthChecker::new(settings(app.uri(), &[]))
        .with_gemini(GeminiTarget::new("SUPERSECRETKEY").with_api_base(format!("http://127.0.0.1:{}", port)));
    let report = checker.check_gemini().await.unwrap();

    assert!(matches!(report.status, HealthStatus::Unreachable(_)));
    assert!(!report.status.to_string().contains("SUPERSECRETKEY"));
}
