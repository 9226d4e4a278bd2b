use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{QaError, QaResult};
use crate::forum::models::AdminInfo;
use crate::forum::store::QaStore;
use crate::forum::validation::{CREDENTIAL_FIELDS, Credentials, NewAdmin, validated};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (admin id as string)
    pub username: String,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at
}

/// Authenticated admin attached to a request by the token verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

impl TryFrom<Claims> for Principal {
    type Error = QaError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims.sub.parse().map_err(|_| QaError::InvalidToken)?;
        Ok(Self {
            id,
            username: claims.username,
        })
    }
}

/// Login Response (JWT)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
    pub admin: AdminInfo,
}

/// Verified against when the username is unknown, so both failure paths do
/// the same amount of work.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("not-a-real-password").ok());

pub fn hash_password(password: &str) -> QaResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| QaError::Internal(format!("Hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

pub struct AuthService {
    store: Arc<dyn QaStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn QaStore>, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Login admin and issue JWT
    pub async fn login(&self, credentials: Credentials) -> QaResult<LoginResponse> {
        let credentials = validated(credentials, CREDENTIAL_FIELDS)?;

        let admin = self
            .store
            .find_admin_by_username(&credentials.username)
            .await?;

        let Some(admin) = admin else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_password(&credentials.password, dummy);
            }
            tracing::warn!(username = %credentials.username, "Login failed");
            return Err(QaError::Unauthorized);
        };

        if !verify_password(&credentials.password, &admin.password_hash) {
            tracing::warn!(username = %credentials.username, "Login failed");
            return Err(QaError::Unauthorized);
        }

        let info = AdminInfo::from(&admin);
        let token = self.issue_token(&info)?;
        tracing::info!(admin_id = info.id, "Admin logged in");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            admin: info,
        })
    }

    /// Bootstrap a new admin; `Conflict` if the username is taken
    pub async fn create_admin(&self, credentials: Credentials) -> QaResult<AdminInfo> {
        let credentials = validated(NewAdmin::from(credentials), CREDENTIAL_FIELDS)?;
        let password_hash = hash_password(&credentials.password)?;
        let id = self
            .store
            .insert_admin(&credentials.username, &password_hash)
            .await?;
        tracing::info!(admin_id = id, username = %credentials.username, "Admin created");
        Ok(AdminInfo {
            id,
            username: credentials.username,
        })
    }

    pub fn issue_token(&self, admin: &AdminInfo) -> QaResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: admin.id.to_string(),
            username: admin.username.clone(),
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| QaError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> QaResult<Principal> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            QaError::InvalidToken
        })?;
        Principal::try_from(token_data.claims)
    }
}
