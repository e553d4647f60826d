use engine_logging::{engine_debug, engine_trace};
use futures_util::StreamExt;
use probe_core::{AttemptTally, HttpMethod, ProbeConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::decode::decode_body;
use crate::preview::prepare_content_preview;
use crate::title::extract_title;
use crate::{CandidateProbe, ProbeError};

/// Bodies beyond this size are cut off; the prefix is still used for the title.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Runs the retry series for one candidate URL.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        candidate_url: &str,
        config: &ProbeConfig,
        cancel: &CancellationToken,
    ) -> Result<CandidateProbe, ProbeError>;
}

/// HTTP prober. Every attempt gets a fresh client with certificate checks off
/// and gzip decoding on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestProber;

enum Attempt {
    Failed,
    Answered { body: Option<String> },
}

impl ReqwestProber {
    pub fn new() -> Self {
        Self
    }

    fn build_client(&self, config: &ProbeConfig) -> Result<reqwest::Client, ProbeError> {
        reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(true)
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(build_headers(config)?)
            .build()
            .map_err(|err| ProbeError::Client(err.to_string()))
    }

    async fn attempt(
        &self,
        client: &reqwest::Client,
        url: &Url,
        method: HttpMethod,
        cancel: &CancellationToken,
    ) -> Result<Attempt, ProbeError> {
        let request = client.request(map_method(method), url.clone()).send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            response = request => response,
        };
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                engine_debug!("Attempt on {} failed: {}", url, describe_error(&err));
                return Ok(Attempt::Failed);
            }
        };

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            bytes = read_body(response) => bytes,
        };
        let body = match bytes {
            Ok(bytes) => {
                let decoded = decode_body(&bytes, content_type.as_deref());
                engine_debug!(
                    "Read {} bytes from {} as {}",
                    bytes.len(),
                    url,
                    decoded.encoding_label
                );
                Some(decoded.text)
            }
            Err(err) => {
                // The host answered; a broken body does not undo that.
                engine_debug!("Body read from {} failed: {}", url, describe_error(&err));
                None
            }
        };
        Ok(Attempt::Answered { body })
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(
        &self,
        candidate_url: &str,
        config: &ProbeConfig,
        cancel: &CancellationToken,
    ) -> Result<CandidateProbe, ProbeError> {
        let mut outcome = CandidateProbe {
            tally: AttemptTally::new(candidate_url),
            title: None,
            content: None,
        };

        let url = match Url::parse(candidate_url) {
            Ok(url) => url,
            Err(err) => {
                engine_debug!("Candidate {:?} is not a valid url: {}", candidate_url, err);
                for _ in 0..config.attempts_per_candidate {
                    outcome.tally.record(false);
                }
                return Ok(outcome);
            }
        };

        for attempt in 1..=config.attempts_per_candidate {
            if cancel.is_cancelled() {
                return Err(ProbeError::Cancelled);
            }
            engine_trace!(
                "Attempt {}/{} on {}",
                attempt,
                config.attempts_per_candidate,
                url
            );
            let client = self.build_client(config)?;
            match self.attempt(&client, &url, config.method, cancel).await? {
                Attempt::Failed => outcome.tally.record(false),
                Attempt::Answered { body } => {
                    outcome.tally.record(true);
                    if let Some(body) = body {
                        if let Some(title) = extract_title(&body) {
                            outcome.title = Some(title);
                        }
                        outcome.content = prepare_content_preview(&body);
                    }
                }
            }
        }

        Ok(outcome)
    }
}

fn build_headers(config: &ProbeConfig) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| ProbeError::InvalidHeader {
                name: name.clone(),
                message: err.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| ProbeError::InvalidHeader {
            name: name.clone(),
            message: err.to_string(),
        })?;
        headers.append(header_name, header_value);
    }
    // Sent alongside any `Cookie` line from the custom headers.
    if let Some(cookie) = config.cookie_header.as_deref() {
        let value = HeaderValue::from_str(cookie).map_err(|err| ProbeError::InvalidHeader {
            name: COOKIE.as_str().to_string(),
            message: err.to_string(),
        })?;
        headers.append(COOKIE, value);
    }
    Ok(headers)
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let room = MAX_BODY_BYTES - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            break;
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
    }
}

fn describe_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timeout ({err})")
    } else if err.is_connect() {
        format!("connect error ({err})")
    } else {
        err.to_string()
    }
}
