use sea_orm::entity::prelude::*;

/// Outgoing mail queued for the mail worker (OTP codes, temporary passwords).
///
/// Rows are written in the request path; delivery, retries and `sent_at` /
/// `failed_at` bookkeeping belong to the worker.
///
/// `payload` carries the secret being mailed in plaintext (`otpCode` or
/// `newPassword`). The worker must strip that key once the job reaches `sent_at` or
/// `failed_at`, so no credential outlives its delivery.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mail_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Template name, e.g. `otp_code` or `new_password`.
    pub template: String,
    pub recipient: String,
    pub payload: Json,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub next_attempt_at: chrono::DateTime<chrono::Utc>,
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub failed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
