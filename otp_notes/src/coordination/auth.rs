use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::mailer::Mailer;
use crate::oauth2::IdTokenVerifier;
use crate::otp::{OtpCode, OtpStore};
use crate::password::{hash_password, verify_password};
use crate::session::{SessionClaims, SessionError, SessionTokens};
use crate::userdb::{User, UserError, UserSearchField, UserStore};
use crate::utils::UtilError;

use super::errors::CoordinationError;
use super::types::{
    AuthResponse, GoogleLoginRequest, LoginRequest, MessageResponse, RegisterRequest,
    SendOtpRequest, UserSummary, Validate, VerifyOtpRequest,
};

const OTP_MAIL_SUBJECT: &str = "Your OTP";

/// OTP issuance, registration and sign-in
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    otps: OtpStore,
    sessions: SessionTokens,
    mailer: Arc<dyn Mailer>,
    id_verifier: Arc<dyn IdTokenVerifier>,
    otp_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: UserStore,
        otps: OtpStore,
        sessions: SessionTokens,
        mailer: Arc<dyn Mailer>,
        id_verifier: Arc<dyn IdTokenVerifier>,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            users,
            otps,
            sessions,
            mailer,
            id_verifier,
            otp_ttl,
        }
    }

    /// Store a fresh code for the address and mail it. Earlier codes stay valid.
    #[tracing::instrument(skip(self), fields(email = %req.email))]
    pub async fn request_otp(
        &self,
        req: SendOtpRequest,
    ) -> Result<MessageResponse, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        let otp = OtpCode::issue(&req.email, self.otp_ttl)?;
        self.otps.insert(&otp).await?;

        let body = format!(
            "Your OTP is {} (valid {} min)",
            otp.code,
            self.otp_ttl.num_minutes()
        );
        self.mailer
            .send_mail(&req.email, OTP_MAIL_SUBJECT, &body)
            .await?;

        tracing::info!("OTP issued");
        Ok(MessageResponse::new("OTP sent"))
    }

    /// Consume a code without creating a session
    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn verify_otp(
        &self,
        req: VerifyOtpRequest,
    ) -> Result<MessageResponse, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        self.otps.consume(&req.email, &req.code, Utc::now()).await?;

        tracing::info!("OTP verified");
        Ok(MessageResponse::new("OTP verified"))
    }

    /// Create a password account. The code is consumed before the duplicate check.
    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        self.otps.consume(&req.email, &req.otp, Utc::now()).await?;

        if self
            .users
            .get_user_by(UserSearchField::Email(req.email.clone()))
            .await?
            .is_some()
        {
            return Err(CoordinationError::DuplicateAccount);
        }

        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| UtilError::Crypto(e.to_string()))??;

        let user = User::new(req.email, req.name).with_password_hash(password_hash);
        let user = self.users.create_user(user).await?;

        tracing::info!(user_id = %user.id, "Account registered");
        self.respond_with_token(&user)
    }

    /// Unknown email, password-less account and wrong password are indistinguishable
    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        let user = self
            .users
            .get_user_by(UserSearchField::Email(req.email.clone()))
            .await?;

        let Some((user, stored_hash)) =
            user.and_then(|u| u.password_hash.clone().map(|hash| (u, hash)))
        else {
            return Err(CoordinationError::InvalidCredentials);
        };

        let password = req.password;
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| UtilError::Crypto(e.to_string()))??;

        if !matches {
            return Err(CoordinationError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "Password login succeeded");
        self.respond_with_token(&user)
    }

    /// Sign in with a Google id token, creating or linking the account by email
    #[tracing::instrument(skip(self, req))]
    pub async fn login_with_google(
        &self,
        req: GoogleLoginRequest,
    ) -> Result<AuthResponse, CoordinationError> {
        req.validate().map_err(CoordinationError::Validation)?;

        let identity = self.id_verifier.verify(&req.id_token).await?;

        let existing = self
            .users
            .get_user_by(UserSearchField::Email(identity.email.clone()))
            .await?;

        let user = match existing {
            Some(user) if user.google_id.is_some() => user,
            Some(user) => {
                tracing::info!(user_id = %user.id, "Linking Google identity to existing account");
                self.users
                    .link_google_id(&user.id, &identity.subject)
                    .await?
            }
            None => {
                let user = User::new(identity.email.clone(), identity.name.clone())
                    .with_google_id(identity.subject.clone());
                match self.users.create_user(user).await {
                    Ok(user) => user,
                    // Lost a race with a concurrent first login for the same email
                    Err(UserError::Duplicate(_)) => self
                        .users
                        .get_user_by(UserSearchField::Email(identity.email.clone()))
                        .await?
                        .ok_or(UserError::NotFound)?,
                    Err(e) => return Err(e.into()),
                }
            }
        };

        tracing::info!(user_id = %user.id, "Google login succeeded");
        self.respond_with_token(&user)
    }

    /// Resolve a bearer token to its claims. Pure check of signature and expiry.
    pub fn authenticate(&self, token: Option<&str>) -> Result<SessionClaims, CoordinationError> {
        let token = token.ok_or(SessionError::Missing)?;
        Ok(self.sessions.verify(token, Utc::now())?)
    }

    fn respond_with_token(&self, user: &User) -> Result<AuthResponse, CoordinationError> {
        Ok(AuthResponse {
            token: self.sessions.issue(user)?,
            user: UserSummary::from(user),
        })
    }
}
