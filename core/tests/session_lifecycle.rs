mod common;

use common::{MockBackend, PASSWORD, TOTP, USER};
use std::sync::Arc;
use std::time::Duration;
use texton_core::api::{
    ApiError, AppConfig, AppContext, AuthError, AuthPhase, LoginOutcome, MemoryStore, Method,
};

fn context(backend: Arc<MockBackend>) -> AppContext {
    AppContext::new(AppConfig::default(), Arc::new(MemoryStore::new()), backend)
}

#[tokio::test]
async fn two_factor_login_then_refresh_on_expiry() {
    let backend = Arc::new(MockBackend::new(true));
    backend.add_file("notes.md", "# notes");
    let ctx = context(backend.clone());
    let auth = ctx.auth();

    assert_eq!(
        auth.login(USER, PASSWORD, None).await.unwrap(),
        LoginOutcome::TwoFactorRequired
    );
    assert_eq!(ctx.session().phase().await, AuthPhase::TwoFactorVerify);

    auth.verify_two_factor(TOTP).await.unwrap();
    assert_eq!(ctx.session().phase().await, AuthPhase::Unlocked);

    backend.expire_access();
    let files = ctx.files().refresh().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(backend.calls(Method::Post, "/auth/refresh"), 1);
    assert_eq!(backend.calls(Method::Get, "/files"), 2);
}

#[tokio::test]
async fn revoked_refresh_token_signs_out() {
    let backend = Arc::new(MockBackend::new(false));
    let ctx = context(backend.clone());
    ctx.auth().login(USER, PASSWORD, None).await.unwrap();

    backend.revoke_all();
    let err = ctx.files().refresh().await.unwrap_err();

    assert!(matches!(
        err,
        texton_core::api::WorkspaceError::Api(ApiError::SessionExpired)
    ));
    assert_eq!(ctx.session().phase().await, AuthPhase::Anonymous);
    assert!(ctx.session().refresh_token().await.is_none());
}

#[tokio::test]
async fn wrong_password_leaves_session_anonymous() {
    let backend = Arc::new(MockBackend::new(false));
    let ctx = context(backend);

    let err = ctx.auth().login(USER, "nope", None).await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref d) if d == "用户名或密码错误"));
    assert_eq!(ctx.session().phase().await, AuthPhase::Anonymous);
}

#[tokio::test(start_paused = true)]
async fn idle_session_locks_and_unlocks_with_code() {
    let backend = Arc::new(MockBackend::new(true));
    let ctx = context(backend.clone());
    let auth = ctx.auth();
    auth.login(USER, PASSWORD, Some(TOTP)).await.unwrap();
    let tasks = ctx.start_background();

    tokio::time::sleep(Duration::from_secs(290)).await;
    assert!(!ctx.session().is_locked().await);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(ctx.session().is_locked().await);

    assert!(auth.unlock("000000").await.is_err());
    assert!(ctx.session().is_locked().await);

    auth.unlock(TOTP).await.unwrap();
    assert_eq!(ctx.session().phase().await, AuthPhase::Unlocked);
    assert_eq!(backend.calls(Method::Post, "/auth/login"), 1);

    tasks.shutdown().await;
}
