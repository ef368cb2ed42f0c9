use std::fmt;

use http::{header::InvalidHeaderValue, HeaderValue};
use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, Zeroize};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
    configuration::Settings,
    credential_store::CredentialStore,
    error::{ApiError, TickTickError},
    utils::{api::ApiClient, base64::basic_auth_header_value},
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash, Default)]
#[serde(transparent)]
pub struct AccessToken(pub String);

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Zeroize for AccessToken {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
impl CloneableSecret for AccessToken {}
impl DebugSecret for AccessToken {}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

impl fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Zeroize for RefreshToken {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
impl CloneableSecret for RefreshToken {}
impl DebugSecret for RefreshToken {}

/// Token endpoint answer to a `refresh_token` grant
#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: Secret<AccessToken>,
    #[serde(default)]
    pub refresh_token: Option<Secret<RefreshToken>>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn bearer_header_value(access_token: &AccessToken) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut header_value: HeaderValue = format!("Bearer {access_token}").parse()?;
    header_value.set_sensitive(true);
    Ok(header_value)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.is_empty()).cloned()
}

/// Current bearer token, and what is needed to get a new one
#[derive(Debug)]
pub struct CredentialManager {
    client_id: Option<String>,
    client_secret: Option<Secret<String>>,
    access_token: Secret<AccessToken>,
    refresh_token: Option<Secret<RefreshToken>>,
    token_url: Url,
    authorization: HeaderValue,
    store: CredentialStore,
}

impl CredentialManager {
    pub fn new(settings: &Settings) -> Result<Self, TickTickError> {
        let access_token = non_empty(
            settings
                .access_token
                .as_ref()
                .map(|token| token.expose_secret()),
        )
        .map(AccessToken)
        .ok_or_else(|| {
            TickTickError::Configuration(
                "TICKTICK_ACCESS_TOKEN environment variable is not set".to_string(),
            )
        })?;
        let authorization = bearer_header_value(&access_token).map_err(|_| {
            TickTickError::Configuration(
                "TICKTICK_ACCESS_TOKEN cannot be used in an HTTP header".to_string(),
            )
        })?;

        Ok(CredentialManager {
            client_id: non_empty(settings.client_id.as_ref()),
            client_secret: non_empty(
                settings
                    .client_secret
                    .as_ref()
                    .map(|secret| secret.expose_secret()),
            )
            .map(Secret::new),
            access_token: Secret::new(access_token),
            refresh_token: non_empty(
                settings
                    .refresh_token
                    .as_ref()
                    .map(|token| token.expose_secret()),
            )
            .map(|token| Secret::new(RefreshToken(token))),
            token_url: settings.token_url.clone(),
            authorization,
            store: CredentialStore::new(&settings.credentials_file),
        })
    }

    /// `Authorization` header value for the current access token
    pub fn authorization_header(&self) -> &HeaderValue {
        &self.authorization
    }

    pub fn access_token(&self) -> &Secret<AccessToken> {
        &self.access_token
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Never fails: every problem is logged and reported as `false`, leaving
    /// the current token in place.
    pub async fn refresh(&mut self, api_client: &ApiClient) -> bool {
        let Some(refresh_token) = self.refresh_token.clone() else {
            warn!("No refresh token available. Cannot refresh access token.");
            return false;
        };
        let (Some(client_id), Some(client_secret)) =
            (self.client_id.clone(), self.client_secret.clone())
        else {
            warn!("Client ID or Client Secret missing. Cannot refresh access token.");
            return false;
        };

        let tokens = match self
            .request_new_tokens(api_client, &refresh_token, &client_id, &client_secret)
            .await
        {
            Ok(tokens) => tokens,
            Err(err) => {
                error!("Error refreshing access token: {err}");
                return false;
            }
        };
        let authorization = match bearer_header_value(tokens.access_token.expose_secret()) {
            Ok(authorization) => authorization,
            Err(err) => {
                error!("Refreshed access token cannot be used in an HTTP header: {err}");
                return false;
            }
        };

        self.access_token = tokens.access_token.clone();
        self.authorization = authorization;
        if let Some(new_refresh_token) = &tokens.refresh_token {
            self.refresh_token = Some(new_refresh_token.clone());
        }

        if let Err(err) = self.store.save_tokens(
            &tokens.access_token.expose_secret().0,
            tokens
                .refresh_token
                .as_ref()
                .map(|token| token.expose_secret().0.as_str()),
            Some(client_id.as_str()),
            Some(client_secret.expose_secret().as_str()),
        ) {
            error!("Failed to save refreshed TickTick tokens: {err:#}");
        } else {
            debug!("Tokens saved to {}", self.store.path().display());
        }

        info!("Access token refreshed successfully.");
        true
    }

    async fn request_new_tokens(
        &self,
        api_client: &ApiClient,
        refresh_token: &Secret<RefreshToken>,
        client_id: &str,
        client_secret: &Secret<String>,
    ) -> Result<TokenResponse, ApiError> {
        let mut authorization: HeaderValue =
            basic_auth_header_value(client_id, client_secret.expose_secret())
                .parse()
                .map_err(|_| ApiError::new("Client credentials cannot be used in an HTTP header"))?;
        authorization.set_sensitive(true);

        let response = api_client
            .post_form(
                self.token_url.as_str(),
                &authorization,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token.expose_secret().0.as_str()),
                ],
            )
            .await?;

        if !response.status.is_success() {
            return Err(ApiError::from_status(
                response.status,
                self.token_url.as_str(),
                response.body,
            ));
        }

        serde_json::from_str(&response.body)
            .map_err(|err| ApiError::from_json_serde_error(err, response.body.clone()))
    }
}
