//! Fetch an access token, then look up a paying user's unionid
//!
//! Run with: cargo run --example paid_unionid -- <openid> <transaction_id>

use std::time::Duration;

use wechat_mp_auth::{
    api::WechatApiResponse,
    middleware::LoggingMiddleware,
    types::{AccessToken, AppId, AppSecret},
    AuthApi, WechatClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let openid = args.next().unwrap_or_else(|| "oUser".to_string());
    let transaction_id = args.next().unwrap_or_else(|| "4200000000".to_string());

    let appid = AppId::new("wx1234567890abcdef")?;
    let secret = AppSecret::new("your_app_secret_here")?;

    let client = WechatClient::builder()
        .timeout(Duration::from_secs(10))
        .with_middleware(LoggingMiddleware::new())
        .build()?;
    let auth_api = AuthApi::new(client);

    let token = auth_api.get_access_token(&appid, &secret).await?;
    token.check()?;
    println!("access_token valid for {}s", token.expires_in);

    let access_token = AccessToken::new(token.access_token)?;
    let paid = auth_api
        .get_paid_unionid(&access_token, &openid, &transaction_id)
        .await?;
    paid.check()?;

    println!("UnionID: {}", paid.unionid);
    Ok(())
}
