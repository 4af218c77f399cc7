mod common;

use murmur::{
    auth::{authenticate, register, resolve_session, Registration},
    models::Gender,
    AppError,
};
use rstest::rstest;

fn registration(email: &str, password: &str) -> Registration {
    Registration {
        name: "Ada".to_string(),
        email: email.to_string(),
        gender: Gender::F,
        password: password.to_string(),
    }
}

#[rstest]
#[case("")]
#[case("a")]
#[case("12345")]
#[case("äöüßé")]
#[tokio::test]
async fn short_passwords_are_rejected(#[case] password: &str) {
    let state = common::state().await;
    let err = register(&state.db, registration("a@x.com", password)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(state.db.get_user_by_email("a@x.com").await.unwrap().is_none());
}

#[rstest]
#[case("123456")]
#[case("secret1")]
#[case("a much longer passphrase")]
#[tokio::test]
async fn long_enough_passwords_register(#[case] password: &str) {
    let state = common::state().await;
    let user = register(&state.db, registration("a@x.com", password)).await.unwrap();
    assert_eq!(user.email, "a@x.com");
    assert_ne!(user.hashed_password, password);
    assert_eq!(user.num_of_visitors, 0);
    assert!(user.privacy.allow_new_messages);
    assert!(user.privacy.appear_in_search_results);
    assert!(!user.privacy.hide_visitors_count);
    assert!(!user.privacy.hide_last_seen);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let state = common::state().await;
    register(&state.db, registration("a@x.com", "secret1")).await.unwrap();
    let err = register(&state.db, registration("a@x.com", "secret2")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn missing_name_is_rejected() {
    let state = common::state().await;
    let mut form = registration("a@x.com", "secret1");
    form.name = "   ".to_string();
    assert!(matches!(register(&state.db, form).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn login_token_resolves_to_the_same_user() {
    let state = common::state().await;
    let user = common::user(&state.db, "Ada", "a@x.com").await;

    let authed = authenticate(&state.db, "a@x.com", common::PASSWORD).await.unwrap();
    assert_eq!(authed.id, user.id);

    let token = state.tokens.issue(&authed, state.config.access_token_ttl).unwrap();
    let resolved = resolve_session(&state.db, &state.tokens, &token).await.unwrap().unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn wrong_password_or_unknown_email_fails() {
    let state = common::state().await;
    common::user(&state.db, "Ada", "a@x.com").await;

    assert!(matches!(
        authenticate(&state.db, "a@x.com", "secret2").await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(matches!(
        authenticate(&state.db, "b@x.com", common::PASSWORD).await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn expired_token_is_no_session() {
    let state = common::state().await;
    let user = common::user(&state.db, "Ada", "a@x.com").await;

    let token = state.tokens.issue(&user, time::Duration::minutes(-1)).unwrap();
    assert!(resolve_session(&state.db, &state.tokens, &token).await.unwrap().is_none());
}

#[tokio::test]
async fn garbage_token_is_no_session() {
    let state = common::state().await;
    assert!(resolve_session(&state.db, &state.tokens, "garbage").await.unwrap().is_none());
}

#[tokio::test]
async fn token_for_unknown_email_is_no_session() {
    let state = common::state().await;
    let other = common::state().await;
    let stranger = common::user(&other.db, "Bob", "b@x.com").await;

    let token = state.tokens.issue(&stranger, state.config.access_token_ttl).unwrap();
    assert!(resolve_session(&state.db, &state.tokens, &token).await.unwrap().is_none());
}
