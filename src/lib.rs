//! WeChat Mini Program auth client for Rust
//!
//! Wraps the three server-side endpoints a mini program backend needs around
//! login and payment:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | [`AuthApi::login`] | `GET /sns/jscode2session` |
//! | [`AuthApi::get_access_token`] | `GET /cgi-bin/token` |
//! | [`AuthApi::get_paid_unionid`] | `GET /wxa/getpaidunionid` (by `transaction_id`) |
//! | [`AuthApi::get_paid_unionid_with_mch`] | `GET /wxa/getpaidunionid` (by `out_trade_no` + `mch_id`) |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechat_mp_auth::{AuthApi, WechatClient};
//! use wechat_mp_auth::api::WechatApiResponse;
//! use wechat_mp_auth::types::{AppId, AppSecret};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthApi::new(WechatClient::builder().build()?);
//!     let appid = AppId::new("wx1234567890abcdef")?;
//!     let secret = AppSecret::new("your_secret")?;
//!
//!     let session = auth.login(&appid, &secret, "code_from_miniprogram").await?;
//!     session.check()?;
//!     println!("OpenID: {}", session.openid);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The platform answers HTTP 200 even when a call fails logically, so there
//! are two layers to check:
//!
//! ```rust,ignore
//! use wechat_mp_auth::WechatError;
//! use wechat_mp_auth::api::WechatApiResponse;
//!
//! match auth.login(&appid, &secret, code).await {
//!     Ok(response) if response.is_success() => { /* use openid / session_key */ }
//!     Ok(response) => eprintln!("platform error {}: {}", response.errcode(), response.errmsg()),
//!     Err(WechatError::Request(e)) => eprintln!("request failed: {}", e),
//!     Err(WechatError::Decode(e)) => eprintln!("unexpected body: {}", e),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Auth operations and response types
//! - [`client`] - HTTP client and builder
//! - [`error`] - Error types
//! - [`middleware`] - Tower layers for the client transport
//! - [`types`] - Validated credential types

pub mod api;
pub mod client;
pub mod error;
pub mod middleware;
pub mod types;

pub use api::auth::AuthApi;
pub use client::{WechatClient, WechatClientBuilder};
pub use error::{RequestError, WechatError};
