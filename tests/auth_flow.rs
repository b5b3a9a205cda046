//! End-to-end flows through the service facade: registration roles, the
//! shared lockout counter, OTP login, and refresh rotation.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use secrecy::SecretString;
use std::time::Duration;

use sesame::accounts::{InMemoryAccountRepository, UserRole};
use sesame::api::LogEmailSender;
use sesame::auth::lockout::LockoutRecord;
use sesame::auth::otp::{OTP_SENT_MESSAGE, OtpRecord};
use sesame::auth::store::{MemoryStore, StateStore};
use sesame::auth::{AuthConfig, AuthError, AuthService};

const OWNER: &str = "owner@example.com";
const PASSWORD: &str = "correct horse battery";

struct Fixture {
    service: AuthService,
    lockout_store: Arc<MemoryStore<LockoutRecord>>,
    otp_store: Arc<MemoryStore<OtpRecord>>,
}

fn fixture() -> Fixture {
    let config = AuthConfig::new(
        OWNER.to_string(),
        SecretString::from("access-secret".to_string()),
        SecretString::from("refresh-secret".to_string()),
    );
    let lockout_store = Arc::new(MemoryStore::new());
    let otp_store = Arc::new(MemoryStore::new());
    let service = AuthService::new(
        &config,
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(LogEmailSender),
        lockout_store.clone(),
        otp_store.clone(),
    );
    Fixture {
        service,
        lockout_store,
        otp_store,
    }
}

async fn register_alice(fx: &Fixture) {
    fx.service
        .register("Alice", "+15550100", "alice@example.com", PASSWORD)
        .await
        .ok();
}

#[tokio::test]
async fn owner_email_registers_as_admin() {
    let fx = fixture();
    let session = fx
        .service
        .register("Owner", "+15550100", "Owner@Example.COM", PASSWORD)
        .await;
    let Ok(session) = session else {
        panic!("expected registration to succeed");
    };
    assert_eq!(session.user.role, UserRole::Admin);
    assert_eq!(session.user.email, OWNER);
}

#[tokio::test]
async fn other_emails_register_as_client() {
    let fx = fixture();
    let session = fx
        .service
        .register("Alice", "+15550100", "alice@example.com", PASSWORD)
        .await;
    let Ok(session) = session else {
        panic!("expected registration to succeed");
    };
    assert_eq!(session.user.role, UserRole::Client);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let fx = fixture();
    register_alice(&fx).await;
    let result = fx
        .service
        .register("Alice Again", "+15550101", "alice@example.com", PASSWORD)
        .await;
    assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
}

#[tokio::test]
async fn login_round_trip() {
    let fx = fixture();
    register_alice(&fx).await;

    let session = fx.service.login("alice@example.com", PASSWORD).await;
    let Ok(session) = session else {
        panic!("expected login to succeed");
    };
    assert!(!session.access_token.is_empty());
    assert!(!session.refresh_token.is_empty());

    let claims = fx.service.verify_access(&session.access_token);
    assert_eq!(claims.ok().map(|c| c.email), Some("alice@example.com".to_string()));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let fx = fixture();
    register_alice(&fx).await;

    let unknown = fx.service.login("bob@example.com", PASSWORD).await;
    let wrong = fx.service.login("alice@example.com", "wrong password").await;

    let Err(unknown) = unknown else {
        panic!("expected unknown email to fail");
    };
    let Err(wrong) = wrong else {
        panic!("expected wrong password to fail");
    };
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn five_failures_lock_for_fifteen_minutes() {
    let fx = fixture();
    register_alice(&fx).await;

    for _ in 0..5 {
        fx.service.login("alice@example.com", "wrong").await.ok();
    }

    // Correct password no longer helps while the lock is active.
    let result = fx.service.login("alice@example.com", PASSWORD).await;
    assert!(matches!(
        result,
        Err(AuthError::AccountLocked {
            retry_after_minutes: 15
        })
    ));
}

#[tokio::test]
async fn password_and_otp_failures_share_one_counter() {
    let fx = fixture();
    register_alice(&fx).await;

    fx.otp_store.set(
        "alice@example.com",
        OtpRecord {
            code: "123456".to_string(),
            expires_at: Utc::now() + TimeDelta::minutes(10),
        },
        Duration::from_secs(600),
    );

    for _ in 0..3 {
        fx.service.login("alice@example.com", "wrong").await.ok();
    }
    for _ in 0..2 {
        fx.service
            .verify_otp("alice@example.com", "999999")
            .await
            .ok();
    }

    // Five mixed failures: the correct OTP now hits the lock.
    let result = fx.service.verify_otp("alice@example.com", "123456").await;
    assert!(matches!(result, Err(AuthError::AccountLocked { .. })));
}

#[tokio::test]
async fn successful_login_resets_the_counter() {
    let fx = fixture();
    register_alice(&fx).await;

    for _ in 0..4 {
        fx.service.login("alice@example.com", "wrong").await.ok();
    }
    assert!(fx.service.login("alice@example.com", PASSWORD).await.is_ok());
    assert!(fx.lockout_store.get("alice@example.com").is_none());

    // The next failure starts a fresh count instead of locking.
    fx.service.login("alice@example.com", "wrong").await.ok();
    assert_eq!(
        fx.lockout_store
            .get("alice@example.com")
            .map(|r| r.failure_count),
        Some(1)
    );
}

#[tokio::test]
async fn expired_lock_reopens_the_identity() {
    let fx = fixture();
    register_alice(&fx).await;

    fx.lockout_store.set(
        "alice@example.com",
        LockoutRecord {
            failure_count: 5,
            locked_until: Some(Utc::now() - TimeDelta::seconds(1)),
        },
        Duration::from_secs(900),
    );

    assert!(fx.service.login("alice@example.com", PASSWORD).await.is_ok());
}

#[tokio::test]
async fn otp_login_round_trip() {
    let fx = fixture();
    register_alice(&fx).await;

    let message = fx.service.request_otp("alice@example.com").await;
    assert_eq!(message.ok(), Some(OTP_SENT_MESSAGE));

    let Some(code) = fx.otp_store.get("alice@example.com").map(|r| r.code) else {
        panic!("expected a stored OTP record");
    };

    let session = fx.service.verify_otp("alice@example.com", &code).await;
    let Ok(session) = session else {
        panic!("expected OTP login to succeed");
    };
    assert_eq!(session.user.email, "alice@example.com");

    // Single use: the same code is dead now.
    let replay = fx.service.verify_otp("alice@example.com", &code).await;
    assert!(matches!(replay, Err(AuthError::OtpInvalid)));
}

#[tokio::test]
async fn otp_request_for_unknown_email_is_silent() {
    let fx = fixture();
    let message = fx.service.request_otp("nobody@example.com").await;
    assert_eq!(message.ok(), Some(OTP_SENT_MESSAGE));
    assert!(fx.otp_store.get("nobody@example.com").is_none());
}

#[tokio::test]
async fn refresh_rotates_and_kills_the_old_token() {
    let fx = fixture();
    register_alice(&fx).await;
    let Ok(session) = fx.service.login("alice@example.com", PASSWORD).await else {
        panic!("expected login to succeed");
    };

    let Ok(rotated) = fx.service.refresh_session(&session.refresh_token).await else {
        panic!("expected refresh to succeed");
    };
    assert_ne!(rotated.refresh_token, session.refresh_token);

    // First generation: superseded.
    let replay = fx.service.refresh_session(&session.refresh_token).await;
    assert!(matches!(replay, Err(AuthError::TokenInvalid)));

    // Second generation rotates again, killing itself in turn.
    let Ok(third) = fx.service.refresh_session(&rotated.refresh_token).await else {
        panic!("expected second refresh to succeed");
    };
    let stale = fx.service.refresh_session(&rotated.refresh_token).await;
    assert!(matches!(stale, Err(AuthError::TokenInvalid)));
    assert!(fx.service.refresh_session(&third.refresh_token).await.is_ok());
}

#[tokio::test]
async fn a_new_login_supersedes_the_previous_session() {
    let fx = fixture();
    register_alice(&fx).await;

    let Ok(first) = fx.service.login("alice@example.com", PASSWORD).await else {
        panic!("expected first login to succeed");
    };
    let Ok(_second) = fx.service.login("alice@example.com", PASSWORD).await else {
        panic!("expected second login to succeed");
    };

    let result = fx.service.refresh_session(&first.refresh_token).await;
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let fx = fixture();
    register_alice(&fx).await;
    let Ok(session) = fx.service.login("alice@example.com", PASSWORD).await else {
        panic!("expected login to succeed");
    };

    let Ok(claims) = fx.service.verify_access(&session.access_token) else {
        panic!("expected valid access token");
    };
    assert!(fx.service.logout(claims.sub).await.is_ok());

    let result = fx.service.refresh_session(&session.refresh_token).await;
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[tokio::test]
async fn profile_reflects_the_registered_account() {
    let fx = fixture();
    register_alice(&fx).await;
    let Ok(session) = fx.service.login("alice@example.com", PASSWORD).await else {
        panic!("expected login to succeed");
    };
    let Ok(claims) = fx.service.verify_access(&session.access_token) else {
        panic!("expected valid access token");
    };

    let profile = fx.service.profile(claims.sub).await;
    let Ok(profile) = profile else {
        panic!("expected profile lookup to succeed");
    };
    assert_eq!(profile.email, "alice@example.com");
    assert_eq!(profile.name, "Alice");
    assert!(profile.is_active);
}

#[tokio::test]
async fn profile_for_unknown_account_is_not_found() {
    let fx = fixture();
    let result = fx.service.profile(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(AuthError::UserNotFound)));
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let fx = fixture();
    register_alice(&fx).await;
    let Ok(session) = fx.service.login("alice@example.com", PASSWORD).await else {
        panic!("expected login to succeed");
    };

    let result = fx.service.verify_access(&session.refresh_token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}
