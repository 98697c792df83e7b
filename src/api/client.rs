use std::sync::Arc;

use log::debug;
use reqwest::{
    Client, StatusCode, Url,
    cookie::{CookieStore, Jar},
    header::{self, HeaderMap, HeaderValue},
};
use serde_json::Value;

use crate::{error::ApiError, session::CookieBundle};

/// Public bearer token shipped with the x.com web app.
pub const BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

const COOKIE_ORIGINS: [&str; 2] = ["https://x.com", "https://api.x.com"];

/// The requests the Twitter operations make. [`ApiClient`] is the real
/// transport; tests swap in a canned one.
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ApiError>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError>;

    fn set_guest_token(&mut self, token: Option<String>);

    fn import_cookies(&self, bundle: &CookieBundle);

    fn export_cookies(&self) -> CookieBundle;
}

/// HTTP transport shared by every Twitter operation.
///
/// Owns the cookie jar, so cookies set by responses (`ct0`, `auth_token`, ...)
/// are replayed on later requests and can be exported as a [`CookieBundle`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    jar: Arc<Jar>,
    language: String,
    guest_token: Option<String>,
}

impl ApiClient {
    pub fn new(language: &str) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            jar,
            language: language.to_string(),
            guest_token: None,
        })
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        classify(status, &body, endpoint_name(url))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let cookies = self.export_cookies();

        insert(
            &mut headers,
            header::AUTHORIZATION,
            &format!("Bearer {BEARER_TOKEN}"),
        );
        insert(&mut headers, header::REFERER, "https://x.com/");
        insert(&mut headers, "x-twitter-active-user", "yes");
        insert(&mut headers, "x-twitter-client-language", &self.language);

        if let Some(csrf) = cookies.get("ct0") {
            insert(&mut headers, "x-csrf-token", csrf);
        }
        if cookies.get("auth_token").is_some() {
            insert(&mut headers, "x-twitter-auth-type", "OAuth2Session");
        }
        if let Some(guest) = &self.guest_token {
            insert(&mut headers, "x-guest-token", guest);
        }

        headers
    }
}

impl HttpClient for ApiClient {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        debug!("GET {}", endpoint_name(url));
        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .query(query)
            .send()
            .await?;

        Self::read(url, response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        debug!("POST {}", endpoint_name(url));
        let response = self
            .client
            .post(url)
            .headers(self.headers())
            .json(body)
            .send()
            .await?;

        Self::read(url, response).await
    }

    fn set_guest_token(&mut self, token: Option<String>) {
        self.guest_token = token;
    }

    fn import_cookies(&self, bundle: &CookieBundle) {
        let Some(url) = origin(COOKIE_ORIGINS[0]) else {
            return;
        };

        for (name, value) in bundle.iter() {
            self.jar
                .add_cookie_str(&format!("{name}={value}; Domain=x.com; Path=/"), &url);
        }
    }

    fn export_cookies(&self) -> CookieBundle {
        let mut bundle = CookieBundle::default();

        for url in COOKIE_ORIGINS.iter().filter_map(|o| origin(o)) {
            let Some(header) = self.jar.cookies(&url) else {
                continue;
            };
            let Ok(header) = header.to_str() else {
                continue;
            };
            for (name, value) in CookieBundle::from_header(header).iter() {
                bundle.insert(name, value);
            }
        }

        bundle
    }
}

fn insert<K: header::IntoHeaderName>(headers: &mut HeaderMap, key: K, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(key, value);
    }
}

fn origin(url: &str) -> Option<Url> {
    url.parse().ok()
}

/// Last path segment, which names the operation (`SearchTimeline`, `task.json`, ...).
fn endpoint_name(url: &str) -> &str {
    let path = url.split('?').next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Maps an HTTP status and body to a JSON value or an [`ApiError`].
pub(crate) fn classify(status: StatusCode, body: &str, what: &str) -> Result<Value, ApiError> {
    match status {
        StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
        StatusCode::FORBIDDEN => {
            return Err(ApiError::Forbidden {
                body: body.to_string(),
            });
        }
        StatusCode::NOT_FOUND => {
            return Err(ApiError::NotFound {
                what: what.to_string(),
            });
        }
        StatusCode::TOO_MANY_REQUESTS => return Err(ApiError::RateLimited),
        status if !status.is_success() => {
            return Err(ApiError::InvalidResponse {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
        _ => {}
    }

    let json: Value = serde_json::from_str(body).map_err(|_| ApiError::InvalidResponse {
        status: status.as_u16(),
        body: body.to_string(),
    })?;

    if json.get("data").is_none() {
        if let Some(message) = json
            .pointer("/errors/0/message")
            .and_then(Value::as_str)
        {
            return Err(ApiError::Graphql {
                message: message.to_string(),
            });
        }
    }

    Ok(json)
}
