//! Authentication flow integration tests: login, refresh rotation, logout,
//! and extractor rejections.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_returns_tokens_and_user_info(pool: PgPool) {
    let user = common::seed_user(&pool, "maria", "admin", Some(1)).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "maria", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "admin");
    assert_eq!(json["user"]["tenant_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password_returns_401(pool: PgPool) {
    common::seed_user(&pool, "maria", "user", None).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "maria", "password": "not-the-password"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    // The message must not reveal whether the username or password failed.
    assert_eq!(json["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_unknown_user_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "ghost", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_account_locks_after_repeated_failures(pool: PgPool) {
    common::seed_user(&pool, "maria", "user", None).await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/auth/login",
            serde_json::json!({"username": "maria", "password": "wrong"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is rejected while the account is locked.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "maria", "password": TEST_PASSWORD}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_tokens(pool: PgPool) {
    common::seed_user(&pool, "maria", "user", None).await;

    let app = common::build_test_app(pool.clone());
    let login = body_json(
        post_json(
            app,
            "/api/v1/auth/login",
            serde_json::json!({"username": "maria", "password": TEST_PASSWORD}),
        )
        .await,
    )
    .await;
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert_ne!(refreshed["refresh_token"], refresh_token.as_str());

    // The old refresh token was revoked by the rotation.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    common::seed_user(&pool, "maria", "user", None).await;

    let app = common::build_test_app(pool.clone());
    let login = body_json(
        post_json(
            app,
            "/api/v1/auth/login",
            serde_json::json!({"username": "maria", "password": TEST_PASSWORD}),
        )
        .await,
    )
    .await;
    let access_token = login["access_token"].as_str().unwrap().to_string();
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/auth/logout",
        &access_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/formative-stages").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/formative-stages", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
