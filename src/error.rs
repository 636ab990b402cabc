use thiserror::Error;

/// Failures that happen before a response body is available
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(http::StatusCode),
}

/// WeChat SDK error types
#[derive(Debug, Error)]
pub enum WechatError {
    #[error("HTTP request error: {0}")]
    Request(#[from] RequestError),

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("WeChat API error (code={code}): {message}")]
    Api { code: i32, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WechatError {
    fn from(err: reqwest::Error) -> Self {
        WechatError::Request(RequestError::Transport(err))
    }
}

impl WechatError {
    /// Turn a platform `errcode` / `errmsg` pair into a `Result`.
    ///
    /// Returns `Ok(())` for `errcode == 0`.
    pub fn check_api(errcode: i32, errmsg: &str) -> Result<(), WechatError> {
        if errcode == 0 {
            return Ok(());
        }
        Err(WechatError::Api {
            code: errcode,
            message: errmsg.to_string(),
        })
    }

    /// Whether this error came from the transport layer rather than the response body
    pub fn is_request(&self) -> bool {
        matches!(self, WechatError::Request(_))
    }
}
