use smarttech_domain::user::UserStatus;

use crate::domain::repository::{MailQueue, OtpCache, UserRepository};
use crate::error::AuthServiceError;
use crate::usecase::otp::{consume_otp, issue_otp};
use crate::usecase::password::{generate_temporary_password, hash_password};

// ── ForgotPassword ───────────────────────────────────────────────────────────

pub struct ForgotPasswordInput {
    pub email: String,
}

pub struct ForgotPasswordUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpCache,
    M: MailQueue,
{
    pub users: U,
    pub otps: O,
    pub mail: M,
}

impl<U, O, M> ForgotPasswordUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpCache,
    M: MailQueue,
{
    /// Sends a reset OTP. Shares the per-email OTP slot with registration.
    pub async fn execute(&self, input: ForgotPasswordInput) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if user.status != UserStatus::Active {
            return Err(AuthServiceError::Conflict("account is not active"));
        }

        issue_otp(&self.otps, &self.mail, &user).await?;
        tracing::info!(user_id = %user.id, "password reset requested");
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub email: String,
    pub otp_code: String,
}

pub struct ResetPasswordUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpCache,
    M: MailQueue,
{
    pub users: U,
    pub otps: O,
    pub mail: M,
}

impl<U, O, M> ResetPasswordUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpCache,
    M: MailQueue,
{
    /// On a valid OTP, replace the password with a generated one and mail it.
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if user.status != UserStatus::Active {
            return Err(AuthServiceError::Conflict("account is not active"));
        }

        consume_otp(&self.otps, &input.email, &input.otp_code).await?;

        let new_password = generate_temporary_password();
        let hash = hash_password(&new_password)?;
        self.users.update_password(user.id, &hash).await?;
        self.mail.send_new_password(&user, &new_password).await?;

        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}
