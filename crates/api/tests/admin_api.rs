//! Admin surface integration tests: user provisioning, the user directory,
//! and the audit trail.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_user(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &admin.token,
        serde_json::json!({
            "username": "novo",
            "email": "novo@example.com",
            "full_name": "Novo Membro",
            "password": "long-enough-secret",
            "role": "user"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "novo");
    assert_eq!(json["data"]["role"], "user");
    assert!(json["data"].get("password_hash").is_none());

    // The new account can log in straight away.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "novo", "password": "long-enough-secret"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_requires_admin(pool: PgPool) {
    let formador = common::seed_user(&pool, "formador", "formador", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &formador.token,
        serde_json::json!({
            "username": "novo",
            "email": "novo@example.com",
            "full_name": "Novo Membro",
            "password": "long-enough-secret",
            "role": "user"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_unknown_role_returns_400(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &admin.token,
        serde_json::json!({
            "username": "novo",
            "email": "novo@example.com",
            "full_name": "Novo Membro",
            "password": "long-enough-secret",
            "role": "wizard"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Unknown role"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_short_password_returns_400(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &admin.token,
        serde_json::json!({
            "username": "novo",
            "email": "novo@example.com",
            "full_name": "Novo Membro",
            "password": "short",
            "role": "user"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_username_returns_409(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;
    common::seed_user(&pool, "taken", "user", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &admin.token,
        serde_json::json!({
            "username": "taken",
            "email": "other@example.com",
            "full_name": "Other",
            "password": "long-enough-secret",
            "role": "user"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_directory_visible_to_formador(pool: PgPool) {
    let formador = common::seed_user(&pool, "formador", "formador", None).await;
    common::seed_user(&pool, "member", "user", None).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users", &formador.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_directory_hidden_from_plain_users(pool: PgPool) {
    let member = common::seed_user(&pool, "member", "user", None).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users", &member.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tenant_scoping_hides_other_tenants(pool: PgPool) {
    let admin_a = common::seed_user(&pool, "admin_a", "admin", Some(1)).await;
    common::seed_user(&pool, "member_a", "user", Some(1)).await;
    let member_b = common::seed_user(&pool, "member_b", "user", Some(2)).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/users", &admin_a.token).await).await;
    let usernames: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&"member_a"));
    assert!(!usernames.contains(&"member_b"));

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/users/{}", member_b.id),
        &admin_a.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_superadmin_sees_all_tenants(pool: PgPool) {
    let superadmin = common::seed_user(&pool, "root", "superadmin", None).await;
    common::seed_user(&pool, "member_a", "user", Some(1)).await;
    common::seed_user(&pool, "member_b", "user", Some(2)).await;

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/users", &superadmin.token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_trail_records_mutations(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/formative-stages",
        &admin.token,
        serde_json::json!({"name": "Discipulado", "order": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/audit-logs", &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    let entry = &json["data"][0];
    assert_eq!(entry["action_type"], "create");
    assert_eq!(entry["entity_type"], "formative_stage");
    assert_eq!(entry["user_id"], admin.id);
    assert_eq!(entry["user_name"], "Test admin");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_trail_filters_by_action(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    // One create entry from the stage, one login entry from authenticating.
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/v1/formative-stages",
        &admin.token,
        serde_json::json!({"name": "Discipulado", "order": 1}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "admin", "password": TEST_PASSWORD}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(
            app,
            "/api/v1/admin/audit-logs?action_type=login",
            &admin.token,
        )
        .await,
    )
    .await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["action_type"], "login");
}
