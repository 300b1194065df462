use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};
use uuid::Uuid;

use smarttech_auth_schema::{mail_jobs, users};
use smarttech_domain::id::UserId;
use smarttech_domain::user::{AuthProvider, UserRole, UserStatus};

use crate::domain::repository::{MailQueue, UserRepository};
use crate::domain::types::{NewUser, UserRecord};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn update(
        &self,
        model: users::ActiveModel,
        what: &'static str,
    ) -> Result<(), AuthServiceError> {
        model.update(&self.db).await.context(what)?;
        Ok(())
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, AuthServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<UserRecord, AuthServiceError> {
        let now = Utc::now();
        let result = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email.clone()),
            password: Set(None),
            status: Set(i16::from(user.status.as_u8())),
            role: Set(i16::from(user.role.as_u8())),
            provider: Set(user.provider.as_str().to_owned()),
            name: Set(user.name.clone()),
            avatar: Set(user.avatar.clone()),
            email_verified_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => user_from_model(model),
            // Lost a race against a concurrent registration of the same email.
            Err(e) if is_unique_violation(&e) => {
                Err(AuthServiceError::Conflict("email already registered"))
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn mark_email_verified(&self, id: UserId) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        self.update(
            users::ActiveModel {
                id: Set(id.0),
                email_verified_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            },
            "mark email verified",
        )
        .await
    }

    async fn activate_with_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        self.update(
            users::ActiveModel {
                id: Set(id.0),
                password: Set(Some(password_hash.to_owned())),
                status: Set(i16::from(UserStatus::Active.as_u8())),
                updated_at: Set(Utc::now()),
                ..Default::default()
            },
            "activate user with password",
        )
        .await
    }

    async fn activate(&self, id: UserId) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        self.update(
            users::ActiveModel {
                id: Set(id.0),
                status: Set(i16::from(UserStatus::Active.as_u8())),
                email_verified_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            },
            "activate user",
        )
        .await
    }

    async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        self.update(
            users::ActiveModel {
                id: Set(id.0),
                password: Set(Some(password_hash.to_owned())),
                updated_at: Set(Utc::now()),
                ..Default::default()
            },
            "update password",
        )
        .await
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn small_enum(value: i16, column: &'static str) -> Result<u8, AuthServiceError> {
    u8::try_from(value)
        .with_context(|| format!("users.{column} out of range: {value}"))
        .map_err(Into::into)
}

fn user_from_model(model: users::Model) -> Result<UserRecord, AuthServiceError> {
    let status =
        UserStatus::from_u8(small_enum(model.status, "status")?).context("users.status")?;
    let role = UserRole::from_u8(small_enum(model.role, "role")?).context("users.role")?;
    let provider = AuthProvider::parse(&model.provider)
        .with_context(|| format!("unknown users.provider: {}", model.provider))?;

    Ok(UserRecord {
        id: UserId(model.id),
        email: model.email,
        password_hash: model.password,
        status,
        role,
        provider,
        name: model.name,
        avatar: model.avatar,
        email_verified_at: model.email_verified_at,
        created_at: model.created_at,
    })
}

// ── Mail outbox ───────────────────────────────────────────────────────────────

pub const TEMPLATE_OTP_CODE: &str = "otp_code";
pub const TEMPLATE_NEW_PASSWORD: &str = "new_password";

/// Payload key holding the plaintext secret; cleared by the worker after delivery.
const OTP_CODE_KEY: &str = "otpCode";
const NEW_PASSWORD_KEY: &str = "newPassword";

/// Template variables for a mail job. The secret sits under `secret_key` only.
fn mail_payload(user: &UserRecord, secret_key: &str, secret: &str) -> serde_json::Value {
    let mut payload = serde_json::json!({
        "userId": user.id,
        "name": user.name,
    });
    payload[secret_key] = serde_json::Value::from(secret);
    payload
}

/// Writes mail jobs into `mail_jobs`; the mail worker delivers them.
#[derive(Clone)]
pub struct OutboxMailQueue {
    pub db: DatabaseConnection,
}

impl OutboxMailQueue {
    async fn enqueue(
        &self,
        template: &'static str,
        recipient: &str,
        payload: serde_json::Value,
    ) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        mail_jobs::ActiveModel {
            id: Set(id),
            template: Set(template.to_owned()),
            recipient: Set(recipient.to_owned()),
            payload: Set(payload),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(now),
            next_attempt_at: Set(now),
            sent_at: Set(None),
            failed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .with_context(|| format!("enqueue {template} mail"))?;

        tracing::debug!(job_id = %id, template, "mail job queued");
        Ok(())
    }
}

impl MailQueue for OutboxMailQueue {
    async fn send_otp_code(
        &self,
        user: &UserRecord,
        otp_code: &str,
    ) -> Result<(), AuthServiceError> {
        let payload = mail_payload(user, OTP_CODE_KEY, otp_code);
        self.enqueue(TEMPLATE_OTP_CODE, &user.email, payload).await
    }

    async fn send_new_password(
        &self,
        user: &UserRecord,
        new_password: &str,
    ) -> Result<(), AuthServiceError> {
        let payload = mail_payload(user, NEW_PASSWORD_KEY, new_password);
        self.enqueue(TEMPLATE_NEW_PASSWORD, &user.email, payload).await
    }
}
