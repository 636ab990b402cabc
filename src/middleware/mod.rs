//! Middleware components for the WeChat client.
//!
//! Layers wrap the [`WechatClient`](crate::client::WechatClient) transport
//! and are installed with
//! [`WechatClientBuilder::with_middleware`](crate::client::WechatClientBuilder::with_middleware).
//!
//! ```ignore
//! use wechat_mp_auth::client::WechatClient;
//! use wechat_mp_auth::middleware::LoggingMiddleware;
//!
//! let client = WechatClient::builder()
//!     .with_middleware(LoggingMiddleware::new())
//!     .build()?;
//! ```

pub use tower::{Layer, Service};

mod logging;

pub use logging::{LoggingMiddleware, LoggingService};
