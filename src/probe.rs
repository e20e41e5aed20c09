use std::time::{Duration, Instant};

use isahc::config::{Configurable, RedirectPolicy};
use isahc::http::Uri;
use isahc::{HttpClientBuilder, Request, ResponseExt};
use thiserror::Error;

// Same redirect ceiling the stock HTTP clients apply before giving up.
const REDIRECT_LIMIT: u32 = 10;

/// Error raised by a single probe. Payloads are plain strings so records
/// stay cloneable and the runner can escalate the same error it recorded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("invalid proxy endpoint: {0}")]
    Proxy(String),

    #[error("building request: {0}")]
    Request(String),

    #[error("request through proxy failed: {0}")]
    Transport(String),
}

/// Timing and outcome of one GET request issued through the proxy.
///
/// Durations are measured from the moment the request was initiated. On
/// failure the untouched phases stay at zero; `status_code` is `0` whenever
/// no response was obtained. A reused transport connection also reports a
/// zero `connect_time`, so treat zero as "not measured" rather than instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestRecord {
    pub connect_time: Duration,
    pub first_byte_time: Duration,
    pub total_time: Duration,
    pub status_code: u16,
    pub error: Option<ProbeError>,
}

impl RequestRecord {
    fn failed(error: ProbeError) -> Self {
        RequestRecord {
            error: Some(error),
            ..Default::default()
        }
    }
}

/// Issue a single GET request for `target` routed through `proxy` and
/// record how long each phase took.
///
/// Every call builds its own client so probes cannot leak connections or
/// cached state into each other. Connect and first-byte times come from the
/// transfer's lifecycle timestamps; total time is sampled the moment the
/// response headers are in hand, so it never includes the body download
/// (the body is dropped unread). A 4xx/5xx response is still a successful
/// probe; only transport-level failures set `error`.
///
/// No request deadline is applied: a proxy that accepts the connection and
/// then hangs will block the probe indefinitely.
pub async fn probe(proxy: &str, target: &str) -> RequestRecord {
    let proxy_uri: Uri = match proxy.parse() {
        Ok(uri) => uri,
        Err(err) => return RequestRecord::failed(ProbeError::Proxy(err.to_string())),
    };

    let client = match HttpClientBuilder::new()
        .proxy(Some(proxy_uri))
        .metrics(true)
        .redirect_policy(RedirectPolicy::Limit(REDIRECT_LIMIT))
        .build()
    {
        Ok(client) => client,
        Err(err) => return RequestRecord::failed(ProbeError::Proxy(err.to_string())),
    };

    let start = Instant::now();

    let request = match Request::get(target).body(()) {
        Ok(request) => request,
        Err(err) => return RequestRecord::failed(ProbeError::Request(err.to_string())),
    };

    match client.send_async(request).await {
        Ok(response) => {
            // Headers are in hand here; the body has not been read.
            let total_time = start.elapsed();

            let (connect_time, first_byte_time) = match response.metrics() {
                Some(metrics) => (metrics.connect_time(), metrics.transfer_start_time()),
                None => (Duration::ZERO, Duration::ZERO),
            };

            RequestRecord {
                connect_time,
                first_byte_time,
                total_time,
                status_code: response.status().as_u16(),
                error: None,
            }
        }
        Err(err) => RequestRecord::failed(ProbeError::Transport(err.to_string())),
    }
}
