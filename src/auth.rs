//! Service account authentication for Google APIs.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{DriveError, Result};
use crate::models::{ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint, used when the credentials omit token_uri.
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read-only Drive scope; this tool never writes to the drive.
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Authenticator for Google APIs using service account credentials.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<ServiceAccountCredentials>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator from a base64-encoded service account
    /// JSON secret (the form CI systems inject via environment variables).
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let credentials: ServiceAccountCredentials = serde_json::from_slice(&bytes)?;
        Ok(Self::new(credentials))
    }

    /// Create a new authenticator from credentials.
    pub fn new(credentials: ServiceAccountCredentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// The service account email, for diagnostics.
    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                // Add 60 second buffer before expiration
                let buffer = Duration::from_secs(60);
                if token.expires_at > SystemTime::now() + buffer {
                    return Ok(token.access_token.clone());
                }
            }
        }

        // Refresh the token
        let new_token = self.refresh_token().await?;

        // Cache the new token
        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    fn token_uri(&self) -> &str {
        self.credentials
            .token_uri
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Refresh the access token using JWT assertion.
    async fn refresh_token(&self) -> Result<CachedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_secs();

        let token_uri = self.token_uri().to_string();
        let claims = Claims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: token_uri.clone(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        // Create JWT
        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &key)?;

        // Exchange JWT for access token
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self
            .client
            .post(&token_uri)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at =
            SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
