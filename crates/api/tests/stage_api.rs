//! Stage catalog integration tests: CRUD, ordering, uniqueness, RBAC.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_stage_returns_201(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/formative-stages",
        &admin.token,
        serde_json::json!({"name": "Discipulado", "order": 1, "description": "First step"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Discipulado");
    assert_eq!(json["data"]["order"], 1);
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_stage_requires_admin(pool: PgPool) {
    let user = common::seed_user(&pool, "pleb", "user", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/formative-stages",
        &user.token,
        serde_json::json!({"name": "Discipulado", "order": 1}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_order_returns_409(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/v1/formative-stages",
        &admin.token,
        serde_json::json!({"name": "Discipulado", "order": 1}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/formative-stages",
        &admin.token,
        serde_json::json!({"name": "Lideranca", "order": 1}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_nonpositive_order_returns_400(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/formative-stages",
        &admin.token,
        serde_json::json!({"name": "Discipulado", "order": 0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_is_sorted_by_order(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    // Insert out of order.
    for (name, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(
            app,
            "/api/v1/formative-stages",
            &admin.token,
            serde_json::json!({"name": name, "order": order}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/formative-stages", &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_missing_stage_returns_404(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/formative-stages/999999", &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_stage_partial(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/formative-stages",
            &admin.token,
            serde_json::json!({"name": "Original", "order": 1, "description": "keep me"}),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/formative-stages/{id}"),
        &admin.token,
        serde_json::json!({"name": "Renamed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    // Omitted fields must be left untouched.
    assert_eq!(json["data"]["description"], "keep me");
    assert_eq!(json["data"]["order"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_stage(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/formative-stages",
            &admin.token,
            serde_json::json!({"name": "Doomed", "order": 1}),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/formative-stages/{id}"), &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/formative-stages/{id}"), &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_stage_with_cycles_is_blocked(pool: PgPool) {
    let admin = common::seed_user(&pool, "admin", "admin", None).await;

    let app = common::build_test_app(pool.clone());
    let stage = body_json(
        post_json_auth(
            app,
            "/api/v1/formative-stages",
            &admin.token,
            serde_json::json!({"name": "In Use", "order": 1}),
        )
        .await,
    )
    .await;
    let stage_id = stage["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/stage-cycles",
        &admin.token,
        serde_json::json!({
            "formative_stage_id": stage_id,
            "name": "Turma 2026",
            "start_date": "2026-01-01",
            "end_date": "2026-06-30"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/formative-stages/{stage_id}"),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
