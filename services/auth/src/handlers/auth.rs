use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use smarttech_auth_types::cookie::{
    REFRESH_TOKEN_COOKIE, clear_refresh_token_cookie, set_refresh_token_cookie,
};

use crate::domain::types::OTP_LEN;
use crate::error::AuthServiceError;
use crate::handlers::extract::AuthenticatedUser;
use crate::handlers::token::AccessTokenResponse;
use crate::state::AppState;
use crate::usecase::password_reset::{
    ForgotPasswordInput, ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use crate::usecase::register::{
    ActivateEmailInput, ActivateEmailUseCase, CreatePasswordInput, CreatePasswordUseCase,
    RegisterInput, RegisterUseCase,
};
use crate::usecase::session::{LoginInput, LoginUseCase, LogoutInput, LogoutUseCase};

/// Minimum length of a user-chosen password.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Lowercase, uppercase and digit required; whitespace forbidden.
pub fn password_policy(password: &str) -> Result<(), ValidationError> {
    let fail = |code: &'static str, message: &'static str| -> Result<(), ValidationError> {
        Err(ValidationError::new(code).with_message(message.into()))
    };
    if password.chars().count() < PASSWORD_MIN_LEN {
        return fail("too_short", "must be at least 6 characters");
    }
    if password.chars().any(char::is_whitespace) {
        return fail("whitespace", "must not contain whitespace");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return fail("lowercase", "must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return fail("uppercase", "must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return fail("digit", "must contain a digit");
    }
    Ok(())
}

fn otp_digits(code: &str) -> Result<(), ValidationError> {
    if code.len() == OTP_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp").with_message("must be 6 digits".into()))
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn message(message: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse { message })
}

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "otp_digits"))]
    pub otp_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePasswordRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "password_policy"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

// ── POST /auth/register, POST /auth/otp/resend ────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        otps: state.otp_cache(),
        mail: state.mail_queue(),
    };
    usecase.execute(RegisterInput { email: body.email }).await?;
    Ok(message("otp sent"))
}

// ── POST /auth/verify-otp ─────────────────────────────────────────────────────

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<OtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;
    let usecase = ActivateEmailUseCase {
        users: state.user_repo(),
        otps: state.otp_cache(),
    };
    usecase
        .execute(ActivateEmailInput {
            email: body.email,
            otp_code: body.otp_code,
        })
        .await?;
    Ok(message("email verified"))
}

// ── POST /auth/create-password ────────────────────────────────────────────────

pub async fn create_password(
    State(state): State<AppState>,
    Json(body): Json<CreatePasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;
    let usecase = CreatePasswordUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(CreatePasswordInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(message("password created"))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;
    let usecase = LoginUseCase {
        users: state.user_repo(),
        tokens: state.token_service(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_refresh_token_cookie(
        jar,
        out.tokens.refresh_token,
        state.cookie_domain.clone(),
        state.tokens.refresh_ttl,
    );
    let body = AccessTokenResponse {
        access_token: out.tokens.access_token,
        access_token_exp: out.tokens.access_token_exp,
    };
    Ok((jar, Json(body)))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty());

    let usecase = LogoutUseCase {
        tokens: state.token_service(),
    };
    usecase
        .execute(LogoutInput {
            access: claims,
            refresh_token,
        })
        .await?;

    let jar = clear_refresh_token_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::OK, jar, message("logged out")))
}

// ── POST /auth/forgot-password ────────────────────────────────────────────────

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;
    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        otps: state.otp_cache(),
        mail: state.mail_queue(),
    };
    usecase
        .execute(ForgotPasswordInput { email: body.email })
        .await?;
    Ok(message("otp sent"))
}

// ── POST /auth/reset-password ─────────────────────────────────────────────────

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<OtpRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    body.validate()?;
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        otps: state.otp_cache(),
        mail: state.mail_queue(),
    };
    usecase
        .execute(ResetPasswordInput {
            email: body.email,
            otp_code: body.otp_code,
        })
        .await?;
    Ok(message("new password sent"))
}
