use std::fmt::Display;

use reqwest::{StatusCode, Url};

use crate::{ActivityCollection, ErrorBody, SignupResponse};

/// A request either never produced a usable response (connection failure,
/// undecodable body) or the server rejected it with a structured detail.
#[derive(Debug)]
pub enum ApiError {
    Transport(reqwest::Error),
    Rejected { status: StatusCode, detail: String },
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "{err}"),
            ApiError::Rejected { detail, .. } => write!(f, "{detail}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err),
            ApiError::Rejected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}

/// Typed client for the activity server. Cheap to clone, so every spawned
/// request task can take its own copy.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The cache token makes every refresh URL distinct, so caching proxies
    /// never serve a stale collection.
    pub fn activities_url(&self, cache_token: u64) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("server address must be a base url")
            .pop_if_empty()
            .push("activities");
        url.query_pairs_mut()
            .append_pair("cache", &cache_token.to_string());
        url
    }

    pub fn signup_url(&self, activity: &str, email: &str) -> Url {
        self.roster_url(activity, "signup", email)
    }

    pub fn unregister_url(&self, activity: &str, email: &str) -> Url {
        self.roster_url(activity, "unregister", email)
    }

    // Activity names and emails can contain spaces, '@' and the like; the
    // name goes in as a percent-encoded path segment and the email as an
    // urlencoded query value.
    fn roster_url(&self, activity: &str, action: &str, email: &str) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("server address must be a base url")
            .pop_if_empty()
            .extend(["activities", activity, action]);
        url.query_pairs_mut().append_pair("email", email);
        url
    }

    pub async fn fetch_activities(
        &self,
        cache_token: u64,
    ) -> Result<ActivityCollection, ApiError> {
        let response = self
            .client
            .get(self.activities_url(cache_token))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(response.json().await?)
    }

    /// Returns the server's confirmation message on success.
    pub async fn signup(&self, activity: &str, email: &str) -> Result<String, ApiError> {
        self.post_roster_change(self.signup_url(activity, email))
            .await
    }

    pub async fn unregister(&self, activity: &str, email: &str) -> Result<String, ApiError> {
        self.post_roster_change(self.unregister_url(activity, email))
            .await
    }

    async fn post_roster_change(&self, url: Url) -> Result<String, ApiError> {
        let response = self.client.post(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let body: SignupResponse = response.json().await?;
        Ok(body.message)
    }

    async fn rejection(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("Server responded with {status}"),
        };
        ApiError::Rejected { status, detail }
    }
}
