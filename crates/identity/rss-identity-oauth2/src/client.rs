//! OAuth2 client for the revenue-sharing identity manager.

use crate::config::OAuthConfig;
use crate::error::{OAuth2Error, OAuth2Result};
use crate::http::IdmHttpClient;
use crate::types::{ApplicationInfo, TokenSession, ValidatedToken};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use url::Url;
use url::form_urlencoded::byte_serialize;

/// `state` value sent with every authorization request
pub const AUTHORIZATION_STATE: &str = "xyz";

/// Drives the authorization-code flow against one configured IdM and
/// enforces the role and client-registration policy.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Arc<IdmHttpClient>,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig, http: Arc<IdmHttpClient>) -> OAuth2Result<Self> {
        config.validate()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    pub fn granted_role(&self) -> &str {
        &self.config.granted_role
    }

    pub fn has_external_login(&self) -> bool {
        self.config.external_login
    }

    /// `Basic base64(client_id:client_secret)`
    pub fn basic_auth_header(&self) -> String {
        let pair = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!("Basic {}", STANDARD.encode(pair))
    }

    fn endpoint(&self, path: &str) -> OAuth2Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.config.base_url, path))?)
    }

    pub fn authorization_url(&self) -> OAuth2Result<Url> {
        let mut url = self.endpoint(&self.config.authorize_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("state", AUTHORIZATION_STATE)
            .append_pair("redirect_uri", &self.config.callback_url);
        Ok(url)
    }

    pub fn token_url(&self, code: &str) -> OAuth2Result<Url> {
        let mut url = self.endpoint(&self.config.access_token_url)?;
        url.query_pairs_mut()
            .append_pair("grant_type", "authorization_code")
            .append_pair("code", code)
            .append_pair("redirect_uri", &self.config.callback_url);
        Ok(url)
    }

    pub fn user_info_url(&self, token: &str) -> OAuth2Result<Url> {
        self.endpoint(&format!("{}{}", self.config.user_info_url, encode(token)))
    }

    pub fn applications_url(&self, actor_id: &str, token: &str) -> OAuth2Result<Url> {
        self.endpoint(&format!(
            "{}{}&access_token={}",
            self.config.get_applications,
            encode(actor_id),
            encode(token)
        ))
    }

    /// Exchange an authorization code for an access token.
    #[instrument(skip(self, code))]
    pub async fn exchange_code_for_token(&self, code: &str) -> OAuth2Result<TokenSession> {
        if code.is_empty() {
            return Err(OAuth2Error::InvalidInput(
                "Authorization code cannot be empty".to_string(),
            ));
        }

        let request = self
            .http
            .client()
            .post(self.token_url(code)?)
            .header(AUTHORIZATION, self.basic_auth_header())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");

        debug!("Requesting access token from {}", self.config.base_url);
        let response = self.http.execute(request).await.map_err(|e| {
            error!("Error obtaining token: {}", e);
            OAuth2Error::TransportFailure {
                context: "Error obtaining token".to_string(),
                source: e,
            }
        })?;

        if !response.is_ok() {
            error!(
                "Token exchange failed with status {}: {}",
                response.status, response.body
            );
            return Err(OAuth2Error::UpstreamError {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        if !response.has_content() {
            return Err(OAuth2Error::InvalidResponse(
                "Token endpoint returned an empty body".to_string(),
            ));
        }

        let session: TokenSession = serde_json::from_str(&response.body)
            .map_err(|e| OAuth2Error::InvalidResponse(format!("Token response: {}", e)))?;

        info!("Successfully exchanged code for tokens");
        Ok(session)
    }

    /// Ask the IdM who owns `token` and which roles they hold.
    ///
    /// An empty 200 answer yields `Ok(None)`.
    #[instrument(skip(self, token))]
    pub async fn fetch_validated_token(&self, token: &str) -> OAuth2Result<Option<ValidatedToken>> {
        if token.is_empty() {
            return Err(OAuth2Error::InvalidInput(
                "User token cannot be empty".to_string(),
            ));
        }

        let request = self.http.client().get(self.user_info_url(token)?);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(OAuth2Error::IdmUnreachable)?;

        if !response.is_ok() {
            error!(
                "User info request failed with status {}: {}",
                response.status, response.body
            );
            return Err(OAuth2Error::AuthError {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        if !response.has_content() {
            debug!("User info response had no content");
            return Ok(None);
        }

        let validated: ValidatedToken = serde_json::from_str(&response.body)
            .map_err(|e| OAuth2Error::InvalidResponse(format!("User info response: {}", e)))?;

        debug!(roles = validated.roles.len(), "Retrieved user info");
        Ok(Some(validated))
    }

    /// Fill in the session's email and granted role from the IdM.
    ///
    /// The first role matching the granted role (ignoring case) wins. A user
    /// with no roles at all is refused; a user whose roles do not include the
    /// granted one keeps `role == None`.
    #[instrument(skip(self, session))]
    pub async fn authorize_session(&self, session: &mut TokenSession) -> OAuth2Result<()> {
        let validated = self
            .fetch_validated_token(&session.access_token)
            .await?
            .unwrap_or_default();

        session.email = validated.email;

        if validated.roles.is_empty() {
            debug!("Access not granted for this user");
            return Err(OAuth2Error::LoginNotAllowed);
        }

        if let Some(role) = validated
            .roles
            .into_iter()
            .find(|role| eq_ignore_case(&role.name, &self.config.granted_role))
        {
            session.role = Some(role.name);
        }

        Ok(())
    }

    /// Exchange `code` and authorize the resulting session.
    pub async fn complete_login(&self, code: &str) -> OAuth2Result<TokenSession> {
        let mut session = self.exchange_code_for_token(code).await?;
        self.authorize_session(&mut session).await?;
        Ok(session)
    }

    /// Validate a caller-supplied token.
    ///
    /// Returns `Ok(None)` without looking at the token when OAuth is disabled.
    #[instrument(skip(self, token))]
    pub async fn check_authentication_token(
        &self,
        token: Option<&str>,
    ) -> OAuth2Result<Option<ValidatedToken>> {
        if !self.config.use_oauth {
            return Ok(None);
        }

        match token {
            Some(token) if !token.is_empty() => self.fetch_validated_token(token).await,
            _ => Err(OAuth2Error::InvalidInput(
                "X-Auth-Token header is required".to_string(),
            )),
        }
    }

    /// List the client applications `actor_id` has access to.
    #[instrument(skip(self, user_token))]
    pub async fn fetch_client_applications(
        &self,
        user_token: &str,
        actor_id: &str,
    ) -> OAuth2Result<Vec<ApplicationInfo>> {
        let request = self
            .http
            .client()
            .get(self.applications_url(actor_id, user_token)?);

        let response = self.http.execute(request).await.map_err(|e| {
            error!("Error obtaining information: {}", e);
            OAuth2Error::TransportFailure {
                context: "Error obtaining information".to_string(),
                source: e,
            }
        })?;

        if !response.is_ok() {
            error!(
                "Applications request failed with status {}: {}",
                response.status, response.body
            );
            return Err(OAuth2Error::UpstreamError {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        if !response.has_content() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&response.body)
            .map_err(|e| OAuth2Error::InvalidResponse(format!("Applications response: {}", e)))
    }

    /// Succeeds when one of `applications` is this client (ignoring case).
    pub fn verify_client_registration(&self, applications: &[ApplicationInfo]) -> OAuth2Result<()> {
        if applications
            .iter()
            .any(|application| eq_ignore_case(&application.id, &self.config.client_id))
        {
            Ok(())
        } else {
            Err(OAuth2Error::InsufficientPermission)
        }
    }

    pub fn is_admin(&self, token: &ValidatedToken) -> bool {
        token.is_admin()
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpClientConfig;
    use crate::types::Role;

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            external_login: true,
            base_url: "https://idm.example.com".to_string(),
            client_id: "ABC".to_string(),
            client_secret: "secret".to_string(),
            authorize_url: "/oauth2/authorize".to_string(),
            access_token_url: "/oauth2/token".to_string(),
            callback_url: "https://rss.example.com/callback".to_string(),
            user_info_url: "/user?access_token=".to_string(),
            get_applications: "/applications.json?actor_id=".to_string(),
            granted_role: "Provider".to_string(),
            use_oauth: true,
        }
    }

    fn test_client() -> OAuthClient {
        let http = Arc::new(IdmHttpClient::new(HttpClientConfig::default()).unwrap());
        OAuthClient::new(test_config(), http).unwrap()
    }

    #[test]
    fn test_basic_auth_header() {
        // base64("ABC:secret")
        assert_eq!(test_client().basic_auth_header(), "Basic QUJDOnNlY3JldA==");
    }

    #[test]
    fn test_authorization_url() {
        let url = test_client().authorization_url().unwrap();
        assert_eq!(url.path(), "/oauth2/authorize");

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                ("response_type".to_string(), "code".to_string()),
                ("client_id".to_string(), "ABC".to_string()),
                ("state".to_string(), "xyz".to_string()),
                (
                    "redirect_uri".to_string(),
                    "https://rss.example.com/callback".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_token_url() {
        let url = test_client().token_url("SplxlOBeZQQYbYS6WxSbIA").unwrap();
        assert_eq!(url.path(), "/oauth2/token");
        assert!(url.as_str().contains("grant_type=authorization_code"));
        assert!(url.as_str().contains("code=SplxlOBeZQQYbYS6WxSbIA"));
        assert!(url.as_str().contains("redirect_uri=https%3A%2F%2Frss.example.com%2Fcallback"));
    }

    #[test]
    fn test_user_info_and_applications_urls() {
        let client = test_client();

        assert_eq!(
            client.user_info_url("tok123").unwrap().as_str(),
            "https://idm.example.com/user?access_token=tok123"
        );
        assert_eq!(
            client.applications_url("alice", "tok123").unwrap().as_str(),
            "https://idm.example.com/applications.json?actor_id=alice&access_token=tok123"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let http = Arc::new(IdmHttpClient::new(HttpClientConfig::default()).unwrap());
        let mut config = test_config();
        config.client_id = String::new();
        assert!(matches!(
            OAuthClient::new(config, http),
            Err(OAuth2Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_verify_client_registration() {
        let client = test_client();

        assert!(client
            .verify_client_registration(&[ApplicationInfo::with_id("abc")])
            .is_ok());
        assert!(client
            .verify_client_registration(&[
                ApplicationInfo::with_id("other"),
                ApplicationInfo::with_id("Abc"),
            ])
            .is_ok());
        assert!(matches!(
            client.verify_client_registration(&[ApplicationInfo::with_id("other")]),
            Err(OAuth2Error::InsufficientPermission)
        ));
        assert!(matches!(
            client.verify_client_registration(&[]),
            Err(OAuth2Error::InsufficientPermission)
        ));
    }

    #[test]
    fn test_is_admin() {
        let client = test_client();
        let token = ValidatedToken {
            roles: vec![Role::named("Seller"), Role::named("Provider")],
            ..ValidatedToken::default()
        };
        assert!(client.is_admin(&token));
        assert!(!client.is_admin(&ValidatedToken::default()));
    }

    #[tokio::test]
    async fn test_check_token_bypass_when_oauth_disabled() {
        let http = Arc::new(IdmHttpClient::new(HttpClientConfig::default()).unwrap());
        let mut config = test_config();
        config.use_oauth = false;
        let client = OAuthClient::new(config, http).unwrap();

        assert!(client.check_authentication_token(None).await.unwrap().is_none());
        assert!(client.check_authentication_token(Some("")).await.unwrap().is_none());
        assert!(client
            .check_authentication_token(Some("anything"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_inputs_are_rejected() {
        let client = test_client();

        assert!(matches!(
            client.check_authentication_token(None).await,
            Err(OAuth2Error::InvalidInput(_))
        ));
        assert!(matches!(
            client.fetch_validated_token("").await,
            Err(OAuth2Error::InvalidInput(_))
        ));
        assert!(matches!(
            client.exchange_code_for_token("").await,
            Err(OAuth2Error::InvalidInput(_))
        ));
    }
}
