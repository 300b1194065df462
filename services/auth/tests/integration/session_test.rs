use smarttech_auth::error::AuthServiceError;
use smarttech_auth::usecase::register::{
    ActivateEmailInput, ActivateEmailUseCase, CreatePasswordInput, CreatePasswordUseCase,
    RegisterInput, RegisterUseCase,
};
use smarttech_auth::usecase::session::{LoginInput, LoginUseCase, LogoutInput, LogoutUseCase};
use smarttech_domain::user::UserStatus;
use smarttech_testing::clock::ManualClock;

use crate::helpers::{
    MemoryBlacklist, MemoryOtpCache, MockMailQueue, MockUserRepo, TEST_PASSWORD,
    awaiting_password_user, pending_user, test_user, token_service,
};

fn login_usecase(
    users: MockUserRepo,
    blacklist: MemoryBlacklist,
    clock: ManualClock,
) -> LoginUseCase<MockUserRepo, MemoryBlacklist, ManualClock> {
    LoginUseCase {
        users,
        tokens: token_service(blacklist, clock),
    }
}

fn logout_usecase(
    blacklist: MemoryBlacklist,
    clock: ManualClock,
) -> LogoutUseCase<MemoryBlacklist, ManualClock> {
    LogoutUseCase {
        tokens: token_service(blacklist, clock),
    }
}

fn credentials(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn should_run_registration_through_logout() {
    let clock = ManualClock::default();
    let users = MockUserRepo::empty();
    let otps = MemoryOtpCache::new(clock.clone());
    let mail = MockMailQueue::default();
    let blacklist = MemoryBlacklist::new(clock.clone());
    let email = "a@x.com";

    RegisterUseCase {
        users: users.clone(),
        otps: otps.clone(),
        mail: mail.clone(),
    }
    .execute(RegisterInput {
        email: email.to_owned(),
    })
    .await
    .unwrap();

    let code = otps.peek(email).unwrap();
    ActivateEmailUseCase {
        users: users.clone(),
        otps: otps.clone(),
    }
    .execute(ActivateEmailInput {
        email: email.to_owned(),
        otp_code: code,
    })
    .await
    .unwrap();

    CreatePasswordUseCase {
        users: users.clone(),
    }
    .execute(CreatePasswordInput {
        email: email.to_owned(),
        password: "Passw0rd".to_owned(),
    })
    .await
    .unwrap();

    let login = login_usecase(users.clone(), blacklist.clone(), clock.clone());
    let out = login.execute(credentials(email, "Passw0rd")).await.unwrap();
    assert_eq!(out.user.email, email);
    assert!(!out.tokens.refresh_token.is_empty());

    let claims = login.tokens.authenticate(&out.tokens.access_token).await.unwrap();
    assert_eq!(claims.sub, out.user.id.to_string());

    logout_usecase(blacklist.clone(), clock.clone())
        .execute(LogoutInput {
            access: claims.clone(),
            refresh_token: Some(out.tokens.refresh_token.clone()),
        })
        .await
        .unwrap();

    assert!(blacklist.ttl_of(&claims.sub, &claims.jti).is_some());
    let result = login.tokens.authenticate(&out.tokens.access_token).await;
    assert!(
        matches!(result, Err(AuthServiceError::Unauthorized)),
        "expected Unauthorized, got {result:?}"
    );
    let result = login.tokens.consume_refresh_token(&out.tokens.refresh_token).await;
    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_login_for_non_active_user() {
    let clock = ManualClock::default();
    let email = "pending@example.com";
    // Correct password, wrong status.
    let mut pending = pending_user(email);
    pending.password_hash = test_user().password_hash;
    let mut disabled = test_user();
    disabled.email = "disabled@example.com".to_owned();
    disabled.status = UserStatus::Disabled;
    let users = MockUserRepo::new(vec![pending, disabled.clone()]);

    let login = login_usecase(users, MemoryBlacklist::new(clock.clone()), clock);
    for email in [email, disabled.email.as_str()] {
        let result = login.execute(credentials(email, TEST_PASSWORD)).await;
        assert!(
            matches!(result, Err(AuthServiceError::Unauthorized)),
            "expected Unauthorized for {email}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_bad_credentials_uniformly() {
    let clock = ManualClock::default();
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone(), awaiting_password_user("b@x.com")]);
    let login = login_usecase(users, MemoryBlacklist::new(clock.clone()), clock);

    for (email, password) in [
        (user.email.as_str(), "Wrong1pw"),
        ("nobody@example.com", TEST_PASSWORD),
        ("b@x.com", TEST_PASSWORD),
    ] {
        let result = login.execute(credentials(email, password)).await;
        assert!(
            matches!(result, Err(AuthServiceError::Unauthorized)),
            "expected Unauthorized for {email}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_issue_tokens_carrying_user_identity() {
    let clock = ManualClock::default();
    let user = test_user();
    let login = login_usecase(
        MockUserRepo::new(vec![user.clone()]),
        MemoryBlacklist::new(clock.clone()),
        clock,
    );

    let out = login.execute(credentials(&user.email, TEST_PASSWORD)).await.unwrap();
    let claims = login.tokens.verify_access_token(&out.tokens.access_token).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.role, user.role);
}

#[tokio::test]
async fn should_logout_even_with_unusable_refresh_cookie() {
    let clock = ManualClock::default();
    let blacklist = MemoryBlacklist::new(clock.clone());
    let user = test_user();
    let login = login_usecase(
        MockUserRepo::new(vec![user.clone()]),
        blacklist.clone(),
        clock.clone(),
    );
    let out = login.execute(credentials(&user.email, TEST_PASSWORD)).await.unwrap();
    let claims = login.tokens.verify_access_token(&out.tokens.access_token).unwrap();

    logout_usecase(blacklist.clone(), clock)
        .execute(LogoutInput {
            access: claims.clone(),
            refresh_token: Some("garbage".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(blacklist.live_entries(), 1);
    assert!(blacklist.ttl_of(&claims.sub, &claims.jti).is_some());
}

#[tokio::test]
async fn should_not_revoke_refresh_token_of_another_user() {
    let clock = ManualClock::default();
    let blacklist = MemoryBlacklist::new(clock.clone());
    let alice = test_user();
    let mut bob = test_user();
    bob.id = smarttech_domain::id::UserId::new();
    bob.email = "bob@example.com".to_owned();
    let login = login_usecase(
        MockUserRepo::new(vec![alice.clone(), bob.clone()]),
        blacklist.clone(),
        clock.clone(),
    );
    let a = login.execute(credentials(&alice.email, TEST_PASSWORD)).await.unwrap();
    let b = login.execute(credentials(&bob.email, TEST_PASSWORD)).await.unwrap();
    let claims = login.tokens.verify_access_token(&a.tokens.access_token).unwrap();

    logout_usecase(blacklist.clone(), clock)
        .execute(LogoutInput {
            access: claims,
            refresh_token: Some(b.tokens.refresh_token.clone()),
        })
        .await
        .unwrap();

    assert!(login.tokens.consume_refresh_token(&b.tokens.refresh_token).await.is_ok());
}
