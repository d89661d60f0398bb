//! OAuth2 integration for GitHub login

use anyhow::Result;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl, basic::BasicClient,
    reqwest::async_http_client,
};
use reqwest::header::ACCEPT;
use tracing::info;

pub const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_USER_URL: &str = "https://api.github.com/user";

/// OAuth2 configuration for GitHub
#[derive(Debug, Clone)]
pub struct GithubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub auth_url: String,
    pub token_url: String,
    /// Endpoint returning the profile of the token owner
    pub user_url: String,
    pub scopes: Vec<String>,
}

impl GithubOAuthConfig {
    /// Configuration against the public GitHub endpoints, asking for `user:email`
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            auth_url: GITHUB_AUTH_URL.to_string(),
            token_url: GITHUB_TOKEN_URL.to_string(),
            user_url: GITHUB_USER_URL.to_string(),
            scopes: vec!["user:email".to_string()],
        }
    }
}

/// Authorization request ready to be sent to the browser
#[derive(Debug)]
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_token: CsrfToken,
    pub pkce_verifier: PkceCodeVerifier,
}

/// GitHub OAuth2 client wrapper
#[derive(Clone)]
pub struct GithubOAuth {
    client: BasicClient,
    scopes: Vec<String>,
    user_url: String,
    http: reqwest::Client,
}

impl GithubOAuth {
    /// Create a new GitHub OAuth2 client
    pub fn new(config: GithubOAuthConfig) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(config.client_id),
            Some(ClientSecret::new(config.client_secret)),
            AuthUrl::new(config.auth_url)?,
            Some(TokenUrl::new(config.token_url)?),
        )
        .set_redirect_uri(RedirectUrl::new(config.callback_url)?);

        // GitHub rejects API calls without a User-Agent
        let http = reqwest::Client::builder()
            .user_agent(concat!("movies-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            scopes: config.scopes,
            user_url: config.user_url,
            http,
        })
    }

    /// Generate authorization URL with PKCE
    pub fn authorize_url(&self) -> AuthorizationRequest {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = self
            .client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge);

        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (url, csrf_token) = request.url();

        AuthorizationRequest {
            url: url.to_string(),
            csrf_token,
            pkce_verifier,
        }
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: String, pkce_verifier: String) -> Result<String> {
        info!("Exchanging GitHub authorization code for access token");

        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(async_http_client)
            .await?;

        Ok(token_response.access_token().secret().clone())
    }

    /// Get the GitHub profile of the token owner, as returned by the API
    pub async fn fetch_profile(&self, access_token: &str) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(&self.user_url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to get GitHub user profile: {}", response.status());
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GithubOAuthConfig {
        GithubOAuthConfig::new(
            "client-123",
            "secret",
            "http://localhost:3000/auth/github/callback",
        )
    }

    #[test]
    fn test_authorize_url_carries_client_scope_and_pkce() {
        let oauth = GithubOAuth::new(config()).unwrap();
        let request = oauth.authorize_url();

        assert!(request.url.starts_with(GITHUB_AUTH_URL));
        assert!(request.url.contains("client_id=client-123"));
        assert!(request.url.contains("scope=user%3Aemail"));
        assert!(request.url.contains("code_challenge_method=S256"));
        assert!(
            request
                .url
                .contains(&format!("state={}", request.csrf_token.secret()))
        );
        assert!(request.url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgithub%2Fcallback"
        ));
    }

    #[test]
    fn test_each_request_gets_fresh_state() {
        let oauth = GithubOAuth::new(config()).unwrap();
        let first = oauth.authorize_url();
        let second = oauth.authorize_url();

        assert_ne!(first.csrf_token.secret(), second.csrf_token.secret());
        assert_ne!(first.pkce_verifier.secret(), second.pkce_verifier.secret());
    }

    #[test]
    fn test_authorize_url_follows_configured_endpoint() {
        let mut config = config();
        config.auth_url = "https://github.example.com/login/oauth/authorize".to_string();

        let request = GithubOAuth::new(config).unwrap().authorize_url();
        assert!(
            request
                .url
                .starts_with("https://github.example.com/login/oauth/authorize?")
        );
    }

    #[test]
    fn test_invalid_callback_url_is_rejected() {
        let mut config = config();
        config.callback_url = "not a url".to_string();
        assert!(GithubOAuth::new(config).is_err());
    }
}
