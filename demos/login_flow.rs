//! Login flow example
//!
//! 1. Receive code from the mini program's wx.login()
//! 2. Exchange it for openid and session_key via code2Session
//!
//! Run with: cargo run --example login_flow -- <js_code>

use wechat_mp_auth::{
    api::WechatApiResponse,
    types::{AppId, AppSecret},
    AuthApi, WechatClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let appid = AppId::new("wx1234567890abcdef")?;
    let secret = AppSecret::new("your_app_secret_here")?;
    let js_code = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "code_from_wx_login".to_string());

    let auth_api = AuthApi::new(WechatClient::builder().build()?);

    match auth_api.login(&appid, &secret, &js_code).await {
        Ok(response) if response.is_success() => {
            println!("Login successful!");
            println!("OpenID: {}", response.openid);
            if let Some(unionid) = response.unionid() {
                println!("UnionID: {}", unionid);
            }
        }
        Ok(response) => {
            eprintln!(
                "Login rejected ({}): {}",
                response.errcode(),
                response.errmsg()
            );
        }
        Err(e) => {
            eprintln!("Login error: {}", e);
        }
    }

    Ok(())
}
