use std::sync::Arc;

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pocketbook_types::{AuthPayload, TokenPair, UserModel};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::jwt::TokenIssuer;
use crate::application::validators::{MIN_PASSWORD_LEN, is_valid_email, is_valid_password};

/// User as held by the repository, password hash included.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn to_model(&self) -> UserModel {
        UserModel {
            id: self.id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<UserProfile>>;
    /// Fails with `AlreadyExists` if the email is taken.
    async fn create(&self, user: NewUser) -> AppResult<UserProfile>;
}

pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    issuer: TokenIssuer,
}

impl AuthUseCases {
    pub fn new(repo: Arc<dyn UserRepo>, issuer: TokenIssuer) -> Self {
        Self { repo, issuer }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<AuthPayload> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() {
            return Err(AppError::InvalidInput("Name is required".into()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput("Invalid email".into()));
        }
        if !is_valid_password(password) {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.repo.get_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyExists);
        }

        let user = self
            .repo
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash: hash_password(password)?,
            })
            .await?;
        info!(user_id = %user.id, "user registered");

        self.payload_for(&user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let email = normalize_email(email);
        let Some(user) = self.repo.get_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        info!(user_id = %user.id, "user logged in");

        self.payload_for(&user)
    }

    /// Exchanges a refresh token for a brand-new pair.
    ///
    /// The presented token is not recorded anywhere: reuse is not detected.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.issuer.verify(refresh_token)?;
        let user = self.subject(&claims.sub).await?;

        let pair = self.issuer.issue_pair(&user.id.to_string(), &user.email)?;
        info!(user_id = %user.id, "token pair issued on refresh");
        Ok(pair)
    }

    /// The user a bearer access token belongs to.
    #[instrument(skip_all)]
    pub async fn current_user(&self, access_token: Option<&str>) -> AppResult<UserModel> {
        let token = access_token.ok_or(AppError::Unauthenticated)?;
        let claims = self
            .issuer
            .verify(token)
            .map_err(|_| AppError::Unauthenticated)?;
        let user = self
            .subject(&claims.sub)
            .await
            .map_err(|_| AppError::Unauthenticated)?;
        Ok(user.to_model())
    }

    async fn subject(&self, sub: &str) -> AppResult<UserProfile> {
        let id = Uuid::parse_str(sub).map_err(|_| AppError::SubjectNotFound)?;
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(AppError::SubjectNotFound)
    }

    fn payload_for(&self, user: &UserProfile) -> AppResult<AuthPayload> {
        let pair = self.issuer.issue_pair(&user.id.to_string(), &user.email)?;
        Ok(AuthPayload {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: user.to_model(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Argon2id with a fresh random salt, encoded as a PHC string.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// A stored hash that does not parse never matches.
fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(error = %e, "stored password hash is not a PHC string");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
