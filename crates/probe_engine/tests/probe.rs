use std::net::TcpListener;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use probe_core::{HttpMethod, ProbeConfig, Stability, Target};
use probe_engine::{probe_target, CancellationToken, ProbeError, Prober, ReqwestProber};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GZIPPED_PAGE: [u8; 78] = [
    0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xb3, 0xc9, 0x28, 0xc9, 0xcd,
    0xb1, 0xb3, 0xc9, 0x48, 0x4d, 0x4c, 0xb1, 0xb3, 0x29, 0xc9, 0x2c, 0xc9, 0x49, 0xb5, 0x8b,
    0xca, 0x2c, 0x28, 0x48, 0x4d, 0x51, 0x50, 0x4b, 0xcc, 0x2d, 0xb0, 0x56, 0x48, 0xcb, 0xcc,
    0x4b, 0xb5, 0xd1, 0x87, 0x48, 0xd8, 0xe8, 0x43, 0x94, 0x25, 0xe5, 0xa7, 0x54, 0xda, 0xa5,
    0x57, 0xd9, 0xe8, 0x83, 0x19, 0x40, 0x51, 0x90, 0x11, 0x00, 0x28, 0xca, 0x2d, 0x4d, 0x49,
    0x00, 0x00, 0x00,
];

fn config(attempts: u32) -> ProbeConfig {
    ProbeConfig {
        attempts_per_candidate: attempts,
        request_timeout: Duration::from_secs(5),
        ..ProbeConfig::default()
    }
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn every_answer_counts_and_title_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title> Caf&eacute; &amp; Bar </title></head><body>menu</body></html>",
            "text/html; charset=utf-8",
        ))
        .expect(3)
        .mount(&server)
        .await;

    let url = format!("{}/home", server.uri());
    let probe = ReqwestProber::new()
        .probe(&url, &config(3), &CancellationToken::new())
        .await
        .expect("probe runs");

    assert_eq!(probe.tally.candidate_url, url);
    assert_eq!(probe.tally.success_count(), 3);
    assert_eq!(probe.tally.attempts(), 3);
    assert_eq!(probe.title.as_deref(), Some("Café & Bar"));
    assert!(probe.content.unwrap().contains("<body>menu</body>"));
}

#[tokio::test]
async fn error_status_still_means_the_host_answered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let probe = ReqwestProber::new()
        .probe(&server.uri(), &config(2), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(probe.tally.success_count(), 2);
    assert_eq!(probe.title, None);
    assert_eq!(probe.content.as_deref(), Some("maintenance"));
}

#[tokio::test]
async fn slow_responses_count_as_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let config = ProbeConfig {
        attempts_per_candidate: 2,
        request_timeout: Duration::from_millis(50),
        ..ProbeConfig::default()
    };
    let probe = ReqwestProber::new()
        .probe(&server.uri(), &config, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(probe.tally.success_count(), 0);
    assert_eq!(probe.tally.attempts(), 2);
    assert_eq!(probe.content, None);
}

#[tokio::test]
async fn gzip_bodies_are_decompressed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Encoding", "gzip")
                .set_body_raw(GZIPPED_PAGE.to_vec(), "text/html"),
        )
        .mount(&server)
        .await;

    let probe = ReqwestProber::new()
        .probe(&server.uri(), &config(1), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(probe.tally.success_count(), 1);
    assert_eq!(probe.title.as_deref(), Some("Zipped & fine"));
}

#[tokio::test]
async fn configured_method_and_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = ProbeConfig {
        method: HttpMethod::Post,
        attempts_per_candidate: 2,
        headers: vec![
            ("X-Probe".to_string(), "one".to_string()),
            ("Accept-Language".to_string(), "en".to_string()),
        ],
        cookie_header: Some("sid=42; theme=dark".to_string()),
        user_agent: "probe-test/1.0".to_string(),
        ..ProbeConfig::default()
    };
    let probe = ReqwestProber::new()
        .probe(&server.uri(), &config, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(probe.tally.success_count(), 2);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    for request in requests {
        let header = |name: &str| {
            request
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        assert_eq!(request.method.as_str(), "POST");
        assert_eq!(header("x-probe").as_deref(), Some("one"));
        assert_eq!(header("accept-language").as_deref(), Some("en"));
        assert_eq!(header("cookie").as_deref(), Some("sid=42; theme=dark"));
        assert_eq!(header("user-agent").as_deref(), Some("probe-test/1.0"));
    }
}

#[tokio::test]
async fn cookie_option_is_sent_next_to_a_custom_cookie_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let config = ProbeConfig {
        attempts_per_candidate: 1,
        headers: vec![("Cookie".to_string(), "lang=en".to_string())],
        cookie_header: Some("sid=42".to_string()),
        ..ProbeConfig::default()
    };
    ReqwestProber::new()
        .probe(&server.uri(), &config, &CancellationToken::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let cookies: Vec<_> = requests[0]
        .headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    assert_eq!(cookies, vec!["lang=en", "sid=42"]);
}

#[tokio::test]
async fn unparsable_candidate_fails_every_attempt() {
    let probe = ReqwestProber::new()
        .probe("http://exa mple.test", &config(3), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(probe.tally.success_count(), 0);
    assert_eq!(probe.tally.attempts(), 3);
}

#[tokio::test]
async fn invalid_header_is_an_error_not_a_failed_attempt() {
    let config = ProbeConfig {
        headers: vec![("Bad Header".to_string(), "x".to_string())],
        ..config(1)
    };
    let err = ReqwestProber::new()
        .probe("http://127.0.0.1:9", &config, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::InvalidHeader { .. }));
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let config = ProbeConfig {
        request_timeout: Duration::from_secs(30),
        ..config(1)
    };
    let err = ReqwestProber::new()
        .probe(&server.uri(), &config, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, ProbeError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn bare_host_falls_back_to_http_when_https_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<head><title>plain</title></head>", "text/html"),
        )
        .mount(&server)
        .await;

    let target = Target {
        id: 1,
        raw: server.address().to_string(),
    };
    let result = probe_target(
        &target,
        &ReqwestProber::new(),
        &config(2),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.resolved_url, format!("http://{}", server.address()));
    assert_eq!(result.state.stability, Stability::Stable);
    assert_eq!(result.state.to_string(), "Stable(2/2)");
    assert_eq!(result.title.as_deref(), Some("plain"));
}

#[tokio::test]
async fn unreachable_on_both_schemes_reports_the_http_candidate() {
    let host = format!("127.0.0.1:{}", closed_port());
    let target = Target {
        id: 7,
        raw: host.clone(),
    };
    let result = probe_target(
        &target,
        &ReqwestProber::new(),
        &config(2),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.id, 7);
    assert_eq!(result.target, host);
    assert_eq!(result.resolved_url, format!("http://{host}"));
    assert_eq!(result.state.to_string(), "Unreachable(0/2)");
    assert_eq!(result.title, None);
}
