use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use reqwest::{Request, Response, Url};
use tower::{Layer, Service};

/// Query keys whose values are replaced before a URL is logged.
const SENSITIVE_KEYS: &[&str] = &[
    "access_token",
    "appsecret",
    "secret",
    "js_code",
    "session_key",
];

const REDACTED: &str = "[REDACTED]";

/// Tower layer that logs each outgoing request and its outcome.
///
/// Credentials in the query string (`secret`, `js_code`, `access_token`, ...)
/// are redacted. Lines go to `info!` by default, or `debug!` when
/// [`verbose`](Self::verbose) is set; transport failures go to `warn!`.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl<S> Layer<S> for LoggingMiddleware {
    type Service = LoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingService<S> {
    inner: S,
    verbose: bool,
}

pub(crate) fn redact_url(url: &Url) -> String {
    let Some(query) = url.query() else {
        return url.to_string();
    };

    let redacted = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{key}={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut base = url.clone();
    base.set_query(None);
    format!("{base}?{redacted}")
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|s| key.eq_ignore_ascii_case(s))
}

fn log_line(verbose: bool, line: std::fmt::Arguments<'_>) {
    if verbose {
        debug!("{}", line);
    } else {
        info!("{}", line);
    }
}

fn log_outcome(result: &Result<Response, reqwest::Error>, elapsed: Duration, verbose: bool) {
    match result {
        Ok(response) => log_line(
            verbose,
            format_args!("[WechatMp] <<< {} ({:?})", response.status(), elapsed),
        ),
        Err(err) => warn!(
            "[WechatMp] {} failure after {:?}: {}",
            failure_kind(err),
            elapsed,
            err.url().map(redact_url).unwrap_or_default()
        ),
    }
}

fn failure_kind(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else {
        "transport"
    }
}

impl<S> Service<Request> for LoggingService<S>
where
    S: Service<Request, Response = Response, Error = reqwest::Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = reqwest::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, reqwest::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let verbose = self.verbose;
        log_line(
            verbose,
            format_args!("[WechatMp] >>> {} {}", req.method(), redact_url(req.url())),
        );

        // Call the instance poll_ready was driven on; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            let start = Instant::now();
            let result = inner.call(req).await;
            log_outcome(&result, start.elapsed(), verbose);
            result
        })
    }
}
