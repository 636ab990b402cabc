//! Common API response primitives
//!
//! Every WeChat response carries `errcode` / `errmsg`, even when the HTTP
//! status is 200. Calls in this crate hand those fields back untouched;
//! [`WechatApiResponse`] gives uniform access to them.
//!
//! ```rust
//! use wechat_mp_auth::api::common::{ApiResponseBase, WechatApiResponse};
//!
//! let json = r#"{"errcode": 40013, "errmsg": "invalid appid"}"#;
//! let resp: ApiResponseBase = serde_json::from_str(json).unwrap();
//! assert!(!resp.is_success());
//! assert!(resp.check().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WechatError;

/// Trait for WeChat API responses that carry `errcode` / `errmsg`.
pub trait WechatApiResponse {
    /// Returns the error code from the API response.
    ///
    /// `0` indicates success; any other value is an error.
    fn errcode(&self) -> i32;

    /// Returns the error message from the API response.
    fn errmsg(&self) -> &str;

    /// Returns `WechatError::Api` when `errcode != 0`.
    fn check(&self) -> Result<(), WechatError> {
        WechatError::check_api(self.errcode(), self.errmsg())
    }

    /// Returns `true` when the response indicates success (`errcode == 0`).
    fn is_success(&self) -> bool {
        self.errcode() == 0
    }
}

/// Response carrying only `errcode` and `errmsg`.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiResponseBase {
    /// Error code (`0` = success)
    #[serde(default)]
    pub errcode: i32,
    /// Error message
    #[serde(default)]
    pub errmsg: String,
}

impl ApiResponseBase {
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            errcode: code,
            errmsg: message.into(),
        }
    }
}

impl WechatApiResponse for ApiResponseBase {
    fn errcode(&self) -> i32 {
        self.errcode
    }

    fn errmsg(&self) -> &str {
        &self.errmsg
    }
}

/// Implements [`WechatApiResponse`] for a struct with `errcode` / `errmsg` fields.
macro_rules! impl_wechat_api_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::api::common::WechatApiResponse for $ty {
                fn errcode(&self) -> i32 {
                    self.errcode
                }

                fn errmsg(&self) -> &str {
                    &self.errmsg
                }
            }
        )+
    };
}

pub(crate) use impl_wechat_api_response;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_success() {
        let resp: ApiResponseBase = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, ApiResponseBase::default());
        assert!(resp.is_success());
        assert!(resp.check().is_ok());
    }

    #[test]
    fn test_check_surfaces_code_and_message() {
        let resp = ApiResponseBase::error(-1, "system error");
        match resp.check() {
            Err(WechatError::Api { code, message }) => {
                assert_eq!(code, -1);
                assert_eq!(message, "system error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_errcode_type_fails_to_decode() {
        let result = serde_json::from_str::<ApiResponseBase>(r#"{"errcode": "bad"}"#);
        assert!(result.is_err());
    }
}
