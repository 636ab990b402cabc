//! WeChat HTTP Client module
//!
//! [`WechatClient`] performs the GET-and-decode round trip; build it with
//! [`WechatClientBuilder`].

mod wechat_client;
pub use wechat_client::WechatClient;

mod builder;
pub use builder::WechatClientBuilder;
