use std::fmt;

use serde::{Deserialize, Serialize};

/// WeChat Mini Program AppID (18 characters, `wx` prefix)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if !id.starts_with("wx") {
            return Err(format!("AppId must start with 'wx', got {}", id));
        }
        if id.len() != 18 {
            return Err(format!("AppId must be 18 characters, got {}", id.len()));
        }
        if !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(format!("AppId must be ASCII alphanumeric, got {}", id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(id: AppId) -> Self {
        id.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credential newtype whose value never shows up in `Debug` output.
macro_rules! secret_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, String> {
                let value = value.into();
                if value.is_empty() {
                    return Err(concat!(stringify!($name), " must not be empty").to_string());
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&"[REDACTED]").finish()
            }
        }
    };
}

secret_string!(
    /// WeChat Mini Program AppSecret
    AppSecret
);

secret_string!(
    /// Server-side access token issued by `/cgi-bin/token`
    AccessToken
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_accepts_wx_prefixed_18_chars() {
        let app_id = AppId::new("wx1234567890abcdef").unwrap();
        assert_eq!(app_id.as_str(), "wx1234567890abcdef");
        assert_eq!(app_id.to_string(), "wx1234567890abcdef");
    }

    #[test]
    fn test_app_id_rejects_bad_length() {
        let err = AppId::new("wx123").unwrap_err();
        assert!(err.contains("18 characters"));
    }

    #[test]
    fn test_app_id_rejects_missing_prefix() {
        let err = AppId::new("ab1234567890abcdef").unwrap_err();
        assert!(err.contains("must start with 'wx'"));
    }

    #[test]
    fn test_app_id_rejects_non_alphanumeric() {
        assert!(AppId::new("wx1234567890abc&ef").is_err());
    }

    #[test]
    fn test_app_id_deserialize_validates() {
        let ok: AppId = serde_json::from_str(r#""wx1234567890abcdef""#).unwrap();
        assert_eq!(ok.as_str(), "wx1234567890abcdef");
        assert!(serde_json::from_str::<AppId>(r#""nope""#).is_err());
    }

    #[test]
    fn test_app_secret_empty() {
        let err = AppSecret::new("").unwrap_err();
        assert_eq!(err, "AppSecret must not be empty");
    }

    #[test]
    fn test_access_token_empty() {
        assert!(AccessToken::new(String::new()).is_err());
    }

    #[test]
    fn test_debug_hides_secret_values() {
        let secret = AppSecret::new("super_secret_value").unwrap();
        let token = AccessToken::new("token_value_123").unwrap();

        let rendered = format!("{secret:?} {token:?}");
        assert!(!rendered.contains("super_secret_value"));
        assert!(!rendered.contains("token_value_123"));
        assert!(rendered.contains("AppSecret"));
        assert_eq!(token.as_str(), "token_value_123");
    }
}
