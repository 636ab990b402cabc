//! WeChat Mini Program API modules
//!
//! - [`common`] - Shared `errcode` / `errmsg` handling
//! - [`auth`] - Login (code2Session), access token, and paid unionid lookup

pub mod auth;
pub mod common;
pub mod r#trait;

pub use auth::{AccessTokenResponse, AuthApi, LoginResponse, PaidUnionIdResponse};
pub use common::{ApiResponseBase, WechatApiResponse};
pub use r#trait::WechatApi;
