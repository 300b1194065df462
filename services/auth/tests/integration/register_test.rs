use smarttech_auth::error::AuthServiceError;
use smarttech_auth::usecase::otp::consume_otp;
use smarttech_auth::usecase::password::verify_password;
use smarttech_auth::usecase::register::{
    ActivateEmailInput, ActivateEmailUseCase, CreatePasswordInput, CreatePasswordUseCase,
    RegisterInput, RegisterUseCase,
};
use smarttech_domain::user::UserStatus;
use smarttech_testing::clock::ManualClock;

use crate::helpers::{
    MemoryOtpCache, MockMailQueue, MockUserRepo, OTP_TTL, SentMail, awaiting_password_user,
    pending_user, test_user,
};

const EMAIL: &str = "a@x.com";

struct Fixture {
    clock: ManualClock,
    users: MockUserRepo,
    otps: MemoryOtpCache,
    mail: MockMailQueue,
}

impl Fixture {
    fn new(users: MockUserRepo) -> Self {
        let clock = ManualClock::default();
        Self {
            otps: MemoryOtpCache::new(clock.clone()),
            clock,
            users,
            mail: MockMailQueue::default(),
        }
    }

    async fn register(&self, email: &str) -> Result<(), AuthServiceError> {
        RegisterUseCase {
            users: self.users.clone(),
            otps: self.otps.clone(),
            mail: self.mail.clone(),
        }
        .execute(RegisterInput {
            email: email.to_owned(),
        })
        .await
        .map(|_| ())
    }

    async fn activate(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        ActivateEmailUseCase {
            users: self.users.clone(),
            otps: self.otps.clone(),
        }
        .execute(ActivateEmailInput {
            email: email.to_owned(),
            otp_code: code.to_owned(),
        })
        .await
    }

    async fn create_password(&self, email: &str, password: &str) -> Result<(), AuthServiceError> {
        CreatePasswordUseCase {
            users: self.users.clone(),
        }
        .execute(CreatePasswordInput {
            email: email.to_owned(),
            password: password.to_owned(),
        })
        .await
    }
}

/// A code guaranteed to differ from `code`.
fn other_code(code: &str) -> String {
    if code == "000000" {
        "111111".to_owned()
    } else {
        "000000".to_owned()
    }
}

// ── register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pending_user_and_mail_otp() {
    let fx = Fixture::new(MockUserRepo::empty());

    fx.register(EMAIL).await.unwrap();

    let user = fx.users.get(EMAIL).unwrap();
    assert_eq!(user.status, UserStatus::Pending);
    assert!(user.password_hash.is_none());

    let code = fx.otps.peek(EMAIL).unwrap();
    assert_eq!(
        fx.mail.sent(),
        vec![SentMail::OtpCode {
            email: EMAIL.to_owned(),
            code
        }]
    );
}

#[tokio::test]
async fn should_overwrite_otp_on_second_register() {
    let fx = Fixture::new(MockUserRepo::empty());

    fx.register(EMAIL).await.unwrap();
    let first = fx.otps.peek(EMAIL).unwrap();
    fx.register(EMAIL).await.unwrap();
    let second = fx.otps.peek(EMAIL).unwrap();

    // Codes may collide by chance; only the live one must validate.
    if first != second {
        let result = fx.activate(EMAIL, &first).await;
        assert!(matches!(result, Err(AuthServiceError::InvalidOtp)));
    }
    fx.activate(EMAIL, &second).await.unwrap();

    assert_eq!(fx.users.users.lock().unwrap().len(), 1, "user is kept, not duplicated");
    assert_eq!(fx.mail.sent().len(), 2);
}

#[tokio::test]
async fn should_conflict_when_email_is_taken() {
    let active = test_user();
    let mut disabled = test_user();
    disabled.email = "disabled@example.com".to_owned();
    disabled.status = UserStatus::Disabled;
    let fx = Fixture::new(MockUserRepo::new(vec![active.clone(), disabled.clone()]));

    for email in [&active.email, &disabled.email] {
        let result = fx.register(email).await;
        assert!(
            matches!(result, Err(AuthServiceError::Conflict("email already registered"))),
            "expected Conflict for {email}, got {result:?}"
        );
    }
    assert!(fx.mail.sent().is_empty());
}

// ── activeEmail ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_otp_after_wrong_code() {
    let fx = Fixture::new(MockUserRepo::empty());
    fx.register(EMAIL).await.unwrap();
    let code = fx.otps.peek(EMAIL).unwrap();

    let result = fx.activate(EMAIL, &other_code(&code)).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOtp)));
    assert_eq!(fx.otps.peek(EMAIL), Some(code.clone()));

    fx.activate(EMAIL, &code).await.unwrap();
    assert!(fx.otps.peek(EMAIL).is_none(), "otp is consumed");
    assert!(fx.users.get(EMAIL).unwrap().is_awaiting_password());
}

#[tokio::test]
async fn should_reject_otp_after_ttl() {
    let fx = Fixture::new(MockUserRepo::empty());
    fx.register(EMAIL).await.unwrap();
    let code = fx.otps.peek(EMAIL).unwrap();

    fx.clock.advance(OTP_TTL);
    let result = fx.activate(EMAIL, &code).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOtp)));
}

#[tokio::test]
async fn should_let_only_one_concurrent_consumer_use_an_otp() {
    let fx = Fixture::new(MockUserRepo::empty());
    fx.register(EMAIL).await.unwrap();
    let code = fx.otps.peek(EMAIL).unwrap();

    let (a, b) = tokio::join!(
        consume_otp(&fx.otps, EMAIL, &code),
        consume_otp(&fx.otps, EMAIL, &code),
    );
    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "a={a:?} b={b:?}"
    );
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser, Err(AuthServiceError::InvalidOtp)));
}

#[tokio::test]
async fn should_activate_once_under_concurrent_requests() {
    let fx = Fixture::new(MockUserRepo::empty());
    fx.register(EMAIL).await.unwrap();
    let code = fx.otps.peek(EMAIL).unwrap();

    let (a, b) = tokio::join!(fx.activate(EMAIL, &code), fx.activate(EMAIL, &code));
    assert!(a.is_ok() != b.is_ok(), "a={a:?} b={b:?}");
    assert!(fx.users.get(EMAIL).unwrap().is_awaiting_password());
}

#[tokio::test]
async fn should_reject_activation_for_unknown_or_active_user() {
    let fx = Fixture::new(MockUserRepo::new(vec![test_user()]));

    let result = fx.activate("nobody@example.com", "123456").await;
    assert!(matches!(result, Err(AuthServiceError::NotFound)));

    let err = fx.activate(&test_user().email, "123456").await.unwrap_err();
    assert!(matches!(err, AuthServiceError::Conflict(_)), "got {err:?}");
    assert_eq!(err.to_string(), "email already verified");
}

// ── createPassword ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_activate_user_with_hashed_password() {
    let fx = Fixture::new(MockUserRepo::new(vec![awaiting_password_user(EMAIL)]));

    fx.create_password(EMAIL, "Passw0rd").await.unwrap();

    let user = fx.users.get(EMAIL).unwrap();
    assert_eq!(user.status, UserStatus::Active);
    let hash = user.password_hash.unwrap();
    assert_ne!(hash, "Passw0rd");
    assert!(verify_password("Passw0rd", &hash).unwrap());
}

#[tokio::test]
async fn should_require_verified_email_before_password() {
    let fx = Fixture::new(MockUserRepo::new(vec![pending_user(EMAIL)]));

    let result = fx.create_password(EMAIL, "Passw0rd").await;
    assert!(
        matches!(result, Err(AuthServiceError::Unauthorized)),
        "expected Unauthorized, got {result:?}"
    );
    assert_eq!(fx.users.get(EMAIL).unwrap().status, UserStatus::Pending);
}

#[tokio::test]
async fn should_refuse_second_password_creation() {
    let fx = Fixture::new(MockUserRepo::new(vec![test_user()]));

    let result = fx.create_password(&test_user().email, "Passw0rd").await;
    assert!(matches!(result, Err(AuthServiceError::Conflict("password already created"))));

    let result = fx.create_password("nobody@example.com", "Passw0rd").await;
    assert!(matches!(result, Err(AuthServiceError::NotFound)));
}
