use rand::RngExt;

use crate::domain::repository::{MailQueue, OtpCache};
use crate::domain::types::{OTP_LEN, UserRecord};
use crate::error::AuthServiceError;

/// Uniformly random decimal code of [`OTP_LEN`] digits (leading zeros kept).
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Replace the user's live OTP with a fresh one and queue it for mailing.
pub async fn issue_otp<O, M>(otps: &O, mail: &M, user: &UserRecord) -> Result<(), AuthServiceError>
where
    O: OtpCache,
    M: MailQueue,
{
    let code = generate_otp();
    otps.store(&user.email, &code).await?;
    mail.send_otp_code(user, &code).await?;
    Ok(())
}

/// Check `code` and consume it on success. A mismatch leaves the entry for retry.
///
/// Of several concurrent callers holding the right code, only the one whose delete
/// removes the entry succeeds; the rest get `InvalidOtp`.
pub async fn consume_otp<O: OtpCache>(
    otps: &O,
    email: &str,
    code: &str,
) -> Result<(), AuthServiceError> {
    if !otps.validate(email, code).await? {
        return Err(AuthServiceError::InvalidOtp);
    }
    if !otps.delete(email).await? {
        tracing::warn!(email, "otp consumed by a concurrent request");
        return Err(AuthServiceError::InvalidOtp);
    }
    Ok(())
}
