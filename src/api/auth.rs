//! WeChat Authentication API
//!
//! Session-code exchange, access-token retrieval and paid-unionid lookup.
//!
//! Each call returns the decoded body as-is. A platform failure such as
//! `{"errcode":40029,"errmsg":"invalid code"}` comes back as `Ok` with a
//! non-zero [`errcode`](WechatApiResponse::errcode); use
//! [`check`](WechatApiResponse::check) to turn it into an error.

use log::debug;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::api::common::{impl_wechat_api_response, WechatApiResponse};
use crate::api::r#trait::WechatApi;
use crate::client::WechatClient;
use crate::error::{RequestError, WechatError};
use crate::types::{AccessToken, AppId, AppSecret};

const LOGIN_PATH: &str = "/sns/jscode2session";
const ACCESS_TOKEN_PATH: &str = "/cgi-bin/token";
const PAID_UNIONID_PATH: &str = "/wxa/getpaidunionid";

/// Login response from code2Session API
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginResponse {
    /// User's unique ID under the Mini Program
    #[serde(default)]
    pub openid: String,
    /// Session key for decrypting user data
    #[serde(default)]
    pub session_key: String,
    /// User's unique ID across the open platform; empty unless the
    /// platform's linking conditions are met
    #[serde(default)]
    pub unionid: String,
    /// Error code (0 means success)
    #[serde(default)]
    pub(crate) errcode: i32,
    /// Error message
    #[serde(default)]
    pub(crate) errmsg: String,
}

impl LoginResponse {
    /// Create a success LoginResponse. Sets errcode to 0 and errmsg to "".
    pub fn new(
        openid: impl Into<String>,
        session_key: impl Into<String>,
        unionid: Option<String>,
    ) -> Self {
        Self {
            openid: openid.into(),
            session_key: session_key.into(),
            unionid: unionid.unwrap_or_default(),
            errcode: 0,
            errmsg: String::new(),
        }
    }

    /// The unionid, if the platform returned one
    pub fn unionid(&self) -> Option<&str> {
        Some(self.unionid.as_str()).filter(|id| !id.is_empty())
    }
}

/// Response from the `/cgi-bin/token` API
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessTokenResponse {
    /// The access token
    #[serde(default)]
    pub access_token: String,
    /// Validity in seconds; the platform currently issues at most 7200
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Response from getPaidUnionId
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaidUnionIdResponse {
    #[serde(default)]
    pub unionid: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

impl_wechat_api_response!(LoginResponse, AccessTokenResponse, PaidUnionIdResponse);

/// WeChat authentication API
///
/// Credentials are passed per call, so one `AuthApi` can serve any number
/// of mini programs.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: WechatClient,
}

impl AuthApi {
    /// Create a new AuthApi instance
    pub fn new(client: WechatClient) -> Self {
        Self { client }
    }

    /// URL called by [`login`](Self::login)
    pub fn login_url(
        &self,
        appid: &AppId,
        secret: &AppSecret,
        js_code: &str,
    ) -> Result<Url, RequestError> {
        self.client
            .encode_url(LOGIN_PATH, &login_query(appid, secret, js_code))
    }

    /// URL called by [`get_access_token`](Self::get_access_token)
    pub fn access_token_url(&self, appid: &AppId, secret: &AppSecret) -> Result<Url, RequestError> {
        self.client
            .encode_url(ACCESS_TOKEN_PATH, &access_token_query(appid, secret))
    }

    /// URL called by [`get_paid_unionid`](Self::get_paid_unionid)
    pub fn paid_unionid_url(
        &self,
        access_token: &AccessToken,
        openid: &str,
        transaction_id: &str,
    ) -> Result<Url, RequestError> {
        self.client.encode_url(
            PAID_UNIONID_PATH,
            &paid_unionid_query(access_token, openid, transaction_id),
        )
    }

    /// URL called by [`get_paid_unionid_with_mch`](Self::get_paid_unionid_with_mch)
    pub fn paid_unionid_with_mch_url(
        &self,
        access_token: &AccessToken,
        openid: &str,
        out_trade_no: &str,
        mch_id: &str,
    ) -> Result<Url, RequestError> {
        self.client.encode_url(
            PAID_UNIONID_PATH,
            &paid_unionid_with_mch_query(access_token, openid, out_trade_no, mch_id),
        )
    }

    /// Login with code from wx.login()
    ///
    /// Calls the code2Session API to exchange a login code for the user's
    /// openid and session key.
    ///
    /// # Arguments
    /// * `appid` - Mini Program AppID
    /// * `secret` - Mini Program AppSecret
    /// * `js_code` - The code obtained from wx.login() on the client
    pub async fn login(
        &self,
        appid: &AppId,
        secret: &AppSecret,
        js_code: &str,
    ) -> Result<LoginResponse, WechatError> {
        let query = login_query(appid, secret, js_code);
        self.send(LOGIN_PATH, &query).await
    }

    /// Get the Mini Program's server-side access token
    ///
    /// GET /cgi-bin/token with `grant_type=client_credential`. The token is
    /// not cached; store it and reuse it until `expires_in` runs out.
    pub async fn get_access_token(
        &self,
        appid: &AppId,
        secret: &AppSecret,
    ) -> Result<AccessTokenResponse, WechatError> {
        let query = access_token_query(appid, secret);
        self.send(ACCESS_TOKEN_PATH, &query).await
    }

    /// Get a user's unionid after payment, keyed by WeChat Pay transaction id
    pub async fn get_paid_unionid(
        &self,
        access_token: &AccessToken,
        openid: &str,
        transaction_id: &str,
    ) -> Result<PaidUnionIdResponse, WechatError> {
        let query = paid_unionid_query(access_token, openid, transaction_id);
        self.send(PAID_UNIONID_PATH, &query).await
    }

    /// Get a user's unionid after payment, keyed by merchant order number
    /// and merchant id
    pub async fn get_paid_unionid_with_mch(
        &self,
        access_token: &AccessToken,
        openid: &str,
        out_trade_no: &str,
        mch_id: &str,
    ) -> Result<PaidUnionIdResponse, WechatError> {
        let query = paid_unionid_with_mch_query(access_token, openid, out_trade_no, mch_id);
        self.send(PAID_UNIONID_PATH, &query).await
    }

    async fn send<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, WechatError>
    where
        T: serde::de::DeserializeOwned + WechatApiResponse,
    {
        let response: T = self.client().get(path, query).await?;
        if !response.is_success() {
            debug!(
                "[{}] {} returned errcode={} errmsg={}",
                self.api_name(),
                path,
                response.errcode(),
                response.errmsg()
            );
        }
        Ok(response)
    }
}

impl WechatApi for AuthApi {
    fn client(&self) -> &WechatClient {
        &self.client
    }

    fn api_name(&self) -> &'static str {
        "auth"
    }
}

fn login_query<'a>(
    appid: &'a AppId,
    secret: &'a AppSecret,
    js_code: &'a str,
) -> [(&'static str, &'a str); 4] {
    [
        ("appid", appid.as_str()),
        ("secret", secret.as_str()),
        ("js_code", js_code),
        ("grant_type", "authorization_code"),
    ]
}

fn access_token_query<'a>(
    appid: &'a AppId,
    secret: &'a AppSecret,
) -> [(&'static str, &'a str); 3] {
    [
        ("appid", appid.as_str()),
        ("secret", secret.as_str()),
        ("grant_type", "client_credential"),
    ]
}

fn paid_unionid_query<'a>(
    access_token: &'a AccessToken,
    openid: &'a str,
    transaction_id: &'a str,
) -> [(&'static str, &'a str); 3] {
    [
        ("openid", openid),
        ("access_token", access_token.as_str()),
        ("transaction_id", transaction_id),
    ]
}

fn paid_unionid_with_mch_query<'a>(
    access_token: &'a AccessToken,
    openid: &'a str,
    out_trade_no: &'a str,
    mch_id: &'a str,
) -> [(&'static str, &'a str); 4] {
    [
        ("openid", openid),
        ("mch_id", mch_id),
        ("out_trade_no", out_trade_no),
        ("access_token", access_token.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> AuthApi {
        AuthApi::new(WechatClient::builder().build().unwrap())
    }

    fn appid() -> AppId {
        AppId::new("wx1234567890abcdef").unwrap()
    }

    fn query_keys(url: &Url) -> Vec<String> {
        url.query_pairs().map(|(k, _)| k.into_owned()).collect()
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_login_url_has_exactly_four_keys() {
        let secret = AppSecret::new("s3cr3t/+=").unwrap();
        let url = api().login_url(&appid(), &secret, "code 081&x").unwrap();

        assert_eq!(url.path(), "/sns/jscode2session");
        assert_eq!(
            query_keys(&url),
            vec!["appid", "grant_type", "js_code", "secret"]
        );
        assert_eq!(
            url.query(),
            Some(
                "appid=wx1234567890abcdef&grant_type=authorization_code\
                 &js_code=code%20081%26x&secret=s3cr3t%2F%2B%3D"
            )
        );
        assert_eq!(query_value(&url, "js_code").as_deref(), Some("code 081&x"));
        assert_eq!(query_value(&url, "secret").as_deref(), Some("s3cr3t/+="));
    }

    #[test]
    fn test_access_token_url_never_carries_js_code() {
        let secret = AppSecret::new("secret").unwrap();
        let url = api().access_token_url(&appid(), &secret).unwrap();

        assert_eq!(url.path(), "/cgi-bin/token");
        assert_eq!(query_keys(&url), vec!["appid", "grant_type", "secret"]);
        assert_eq!(
            query_value(&url, "grant_type").as_deref(),
            Some("client_credential")
        );
    }

    #[test]
    fn test_paid_unionid_urls_use_exclusive_key_sets() {
        let token = AccessToken::new("ACCESS_TOKEN").unwrap();
        let by_transaction = api()
            .paid_unionid_url(&token, "oUser", "4200000001")
            .unwrap();
        let by_mch = api()
            .paid_unionid_with_mch_url(&token, "oUser", "order-1", "1230000109")
            .unwrap();

        assert_eq!(by_transaction.path(), by_mch.path());
        assert_eq!(by_transaction.path(), "/wxa/getpaidunionid");

        assert_eq!(
            query_keys(&by_transaction),
            vec!["access_token", "openid", "transaction_id"]
        );
        assert_eq!(
            query_keys(&by_mch),
            vec!["access_token", "mch_id", "openid", "out_trade_no"]
        );
        assert_eq!(
            query_value(&by_mch, "out_trade_no").as_deref(),
            Some("order-1")
        );
        assert_eq!(
            query_value(&by_mch, "mch_id").as_deref(),
            Some("1230000109")
        );
    }

    #[test]
    fn test_login_response_minimal_success() {
        let json = r#"{"errcode":0,"openid":"o1","session_key":"k1"}"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.errcode(), 0);
        assert_eq!(response.openid, "o1");
        assert_eq!(response.session_key, "k1");
        assert_eq!(response.unionid, "");
        assert_eq!(response.unionid(), None);
    }

    #[test]
    fn test_login_response_with_unionid() {
        let json = r#"{
            "openid": "oABC123xyz",
            "session_key": "test_session_key_abc",
            "unionid": "uABC123union"
        }"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        assert_eq!(response.unionid(), Some("uABC123union"));
    }

    #[test]
    fn test_login_response_error_parse() {
        let json = r#"{"errcode": 40029, "errmsg": "invalid code"}"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.errcode(), 40029);
        assert_eq!(response.errmsg(), "invalid code");
        assert!(!response.is_success());
        assert!(response.openid.is_empty());
        assert!(response.session_key.is_empty());
    }

    #[test]
    fn test_login_response_new_is_success() {
        let response = LoginResponse::new("o1", "k1", Some("u1".to_string()));
        assert!(response.check().is_ok());
        assert_eq!(response.unionid(), Some("u1"));
    }

    #[test]
    fn test_access_token_response_parse() {
        let json = r#"{"access_token": "ACCESS_TOKEN", "expires_in": 7200}"#;

        let response: AccessTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "ACCESS_TOKEN");
        assert_eq!(response.expires_in, 7200);
        assert!(response.is_success());
    }

    #[test]
    fn test_paid_unionid_response_error() {
        let json = r#"{"errcode": 89300, "errmsg": "订单无效"}"#;

        let response: PaidUnionIdResponse = serde_json::from_str(json).unwrap();
        assert!(response.unionid.is_empty());
        assert!(matches!(
            response.check(),
            Err(WechatError::Api { code: 89300, .. })
        ));
    }
}
