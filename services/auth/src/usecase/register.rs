use smarttech_domain::user::UserStatus;

use crate::domain::repository::{MailQueue, OtpCache, UserRepository};
use crate::domain::types::{NewUser, UserRecord};
use crate::error::AuthServiceError;
use crate::usecase::otp::{consume_otp, issue_otp};
use crate::usecase::password::hash_password;

// ── Register (NotRegistered → OtpSent) ───────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
}

pub struct RegisterUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpCache,
    M: MailQueue,
{
    pub users: U,
    pub otps: O,
    pub mail: M,
}

impl<U, O, M> RegisterUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpCache,
    M: MailQueue,
{
    /// Also serves "resend OTP": a repeated call overwrites the previous code.
    pub async fn execute(&self, input: RegisterInput) -> Result<UserRecord, AuthServiceError> {
        let user = match self.users.find_by_email(&input.email).await? {
            Some(user) if user.status != UserStatus::Pending => {
                return Err(AuthServiceError::Conflict("email already registered"));
            }
            Some(user) => user,
            None => {
                let user = self.users.create(&NewUser::pending(&input.email)).await?;
                tracing::info!(user_id = %user.id, "pending user created");
                user
            }
        };

        issue_otp(&self.otps, &self.mail, &user).await?;
        Ok(user)
    }
}

// ── ActivateEmail (OtpSent → AwaitingPassword) ───────────────────────────────

pub struct ActivateEmailInput {
    pub email: String,
    pub otp_code: String,
}

pub struct ActivateEmailUseCase<U, O>
where
    U: UserRepository,
    O: OtpCache,
{
    pub users: U,
    pub otps: O,
}

impl<U, O> ActivateEmailUseCase<U, O>
where
    U: UserRepository,
    O: OtpCache,
{
    pub async fn execute(&self, input: ActivateEmailInput) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if user.status != UserStatus::Pending {
            return Err(AuthServiceError::Conflict("email already verified"));
        }

        consume_otp(&self.otps, &input.email, &input.otp_code).await?;
        self.users.mark_email_verified(user.id).await?;

        tracing::info!(user_id = %user.id, "email verified");
        Ok(())
    }
}

// ── CreatePassword (AwaitingPassword → Active) ───────────────────────────────

pub struct CreatePasswordInput {
    pub email: String,
    pub password: String,
}

pub struct CreatePasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreatePasswordUseCase<U> {
    pub async fn execute(&self, input: CreatePasswordInput) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if user.status != UserStatus::Pending || user.password_hash.is_some() {
            return Err(AuthServiceError::Conflict("password already created"));
        }
        if !user.is_awaiting_password() {
            // Email not yet proven by OTP.
            return Err(AuthServiceError::Unauthorized);
        }

        let hash = hash_password(&input.password)?;
        self.users.activate_with_password(user.id, &hash).await?;

        tracing::info!(user_id = %user.id, "password created, account active");
        Ok(())
    }
}
