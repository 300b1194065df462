use smarttech_auth::domain::types::TEMP_PASSWORD_LEN;
use smarttech_auth::error::AuthServiceError;
use smarttech_auth::usecase::password::verify_password;
use smarttech_auth::usecase::password_reset::{
    ForgotPasswordInput, ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use smarttech_domain::user::UserStatus;
use smarttech_testing::clock::ManualClock;

use crate::helpers::{
    MemoryOtpCache, MockMailQueue, MockUserRepo, OTP_TTL, SentMail, TEST_PASSWORD, pending_user,
    test_user,
};

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

    async fn forgot(&self, email: &str) -> Result<(), AuthServiceError> {
        ForgotPasswordUseCase {
            users: self.users.clone(),
            otps: self.otps.clone(),
            mail: self.mail.clone(),
        }
        .execute(ForgotPasswordInput {
            email: email.to_owned(),
        })
        .await
    }

    async fn reset(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        ResetPasswordUseCase {
            users: self.users.clone(),
            otps: self.otps.clone(),
            mail: self.mail.clone(),
        }
        .execute(ResetPasswordInput {
            email: email.to_owned(),
            otp_code: code.to_owned(),
        })
        .await
    }
}

#[tokio::test]
async fn should_replace_password_after_valid_otp() {
    let user = test_user();
    let fx = Fixture::new(MockUserRepo::new(vec![user.clone()]));

    fx.forgot(&user.email).await.unwrap();
    let code = fx.otps.peek(&user.email).unwrap();
    fx.reset(&user.email, &code).await.unwrap();

    assert!(fx.otps.peek(&user.email).is_none());
    let sent = fx.mail.sent();
    assert_eq!(sent.len(), 2);
    let SentMail::NewPassword { email, password } = &sent[1] else {
        panic!("expected new password mail, got {:?}", sent[1]);
    };
    assert_eq!(email, &user.email);
    assert_eq!(password.len(), TEMP_PASSWORD_LEN);

    let stored = fx.users.get(&user.email).unwrap();
    let hash = stored.password_hash.unwrap();
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password(TEST_PASSWORD, &hash).unwrap());
    assert_eq!(stored.status, UserStatus::Active);
}

#[tokio::test]
async fn should_issue_one_temporary_password_for_concurrent_resets() {
    let user = test_user();
    let fx = Fixture::new(MockUserRepo::new(vec![user.clone()]));
    fx.forgot(&user.email).await.unwrap();
    let code = fx.otps.peek(&user.email).unwrap();

    let (a, b) = tokio::join!(fx.reset(&user.email, &code), fx.reset(&user.email, &code));
    assert!(a.is_ok() != b.is_ok(), "a={a:?} b={b:?}");

    let passwords: Vec<_> = fx
        .mail
        .sent()
        .into_iter()
        .filter_map(|mail| match mail {
            SentMail::NewPassword { password, .. } => Some(password),
            SentMail::OtpCode { .. } => None,
        })
        .collect();
    assert_eq!(passwords.len(), 1);
    let hash = fx.users.get(&user.email).unwrap().password_hash.unwrap();
    assert!(verify_password(&passwords[0], &hash).unwrap());
}

#[tokio::test]
async fn should_keep_password_on_wrong_or_expired_otp() {
    let user = test_user();
    let fx = Fixture::new(MockUserRepo::new(vec![user.clone()]));
    fx.forgot(&user.email).await.unwrap();
    let code = fx.otps.peek(&user.email).unwrap();
    let wrong = if code == "999999" { "000000" } else { "999999" };

    let result = fx.reset(&user.email, wrong).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOtp)));
    assert_eq!(fx.otps.peek(&user.email), Some(code.clone()), "retry allowed");

    fx.clock.advance(OTP_TTL);
    let result = fx.reset(&user.email, &code).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOtp)));

    assert_eq!(fx.users.get(&user.email).unwrap().password_hash, user.password_hash);
    assert_eq!(fx.mail.sent().len(), 1, "only the otp mail went out");
}

#[tokio::test]
async fn should_refuse_reset_for_unknown_or_inactive_user() {
    let fx = Fixture::new(MockUserRepo::new(vec![pending_user("p@x.com")]));

    let result = fx.forgot("nobody@example.com").await;
    assert!(matches!(result, Err(AuthServiceError::NotFound)));

    for result in [fx.forgot("p@x.com").await, fx.reset("p@x.com", "123456").await] {
        let err = result.unwrap_err();
        assert!(matches!(err, AuthServiceError::Conflict(_)), "got {err:?}");
        assert_eq!(err.to_string(), "account is not active");
    }
    assert!(fx.mail.sent().is_empty());
}
