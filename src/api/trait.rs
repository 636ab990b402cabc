//! WeChat API trait
//!
//! Shared surface of the API groups built on top of [`WechatClient`].

use crate::client::WechatClient;

/// Trait for WeChat API implementations.
pub trait WechatApi: Send + Sync {
    /// The client requests are issued through
    fn client(&self) -> &WechatClient;

    /// Name used to tag log lines (e.g., "auth").
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
