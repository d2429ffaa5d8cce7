//! HTTP-level tests for the WhatsApp template, instance management and
//! broadcasts, using an in-memory gateway.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, build_test_app, build_test_app_with_config, build_test_app_with_gateway,
    create_project, delete, get, post_json, put_json, test_config, token, FakeGateway,
};
use sqlx::PgPool;

async fn add_guest(app: Router, owner: &str, project_id: i64, body: serde_json::Value) -> i64 {
    let response = post_json(app, &format!("/api/v1/projects/{project_id}/guests"), owner, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn message_status(app: Router, owner: &str, project_id: i64, guest_id: i64) -> String {
    let json = body_json(get(app, &format!("/api/v1/projects/{project_id}/guests/{guest_id}"), owner).await).await;
    json["data"]["message_status"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn config_is_empty_until_saved(pool: PgPool) {
    let app = build_test_app(pool);
    let owner = token("user_1");
    let project_id = create_project(app.clone(), &owner, "Casamento").await;
    let uri = format!("/api/v1/projects/{project_id}/whatsapp/config");

    let json = body_json(get(app.clone(), &uri, &owner).await).await;
    assert_eq!(json["data"]["introduction"], "");
    assert_eq!(json["data"]["conclusion"], "");

    let body = serde_json::json!({ "introduction": "Olá!", "conclusion": "Até lá" });
    let response = put_json(app.clone(), &uri, &owner, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "introduction": "Oi", "conclusion": "Tchau" });
    put_json(app.clone(), &uri, &owner, body).await;

    let json = body_json(get(app, &uri, &owner).await).await;
    assert_eq!(json["data"]["introduction"], "Oi");
    assert_eq!(json["data"]["conclusion"], "Tchau");
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn instance_lifecycle(pool: PgPool) {
    let gateway = Arc::new(FakeGateway::default());
    let app = build_test_app_with_gateway(pool, gateway.clone());
    let owner = token("user_1");
    let project_id = create_project(app.clone(), &owner, "Casamento").await;
    let uri = format!("/api/v1/projects/{project_id}/whatsapp/instance");
    let expected_name = format!("sprezzia-{project_id}");

    let json = body_json(get(app.clone(), &uri, &owner).await).await;
    assert_eq!(json["data"]["instance_name"], expected_name.as_str());
    assert_eq!(json["data"]["state"], "unknown");

    let response = post_json(app.clone(), &uri, &owner, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["qrcode"]["code"], format!("qr-{expected_name}"));

    // Creating again reuses the existing instance.
    let response = post_json(app.clone(), &uri, &owner, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get(app.clone(), &uri, &owner).await).await;
    assert_eq!(json["data"]["state"], "connecting");

    let response = post_json(app.clone(), &format!("{uri}/reconnect"), &owner, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(delete(app.clone(), &uri, &owner).await.status(), StatusCode::NO_CONTENT);
    assert!(gateway.instances.lock().unwrap().is_empty());

    let response = delete(app, &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "GATEWAY_ERROR");
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn broadcast_tallies_every_guest(pool: PgPool) {
    let gateway = Arc::new(FakeGateway::default());
    gateway.fail_for("5511900000002");
    let app = build_test_app_with_gateway(pool, gateway.clone());
    let owner = token("user_1");
    let project_id = create_project(app.clone(), &owner, "Casamento").await;

    let ok = add_guest(
        app.clone(),
        &owner,
        project_id,
        serde_json::json!({ "name": "Ana", "phone": "(11) 90000-0001", "companions": [{ "name": "Bruno" }] }),
    )
    .await;
    let failing = add_guest(app.clone(), &owner, project_id, serde_json::json!({ "name": "Carla", "phone": "11900000002" })).await;
    let no_digits = add_guest(app.clone(), &owner, project_id, serde_json::json!({ "name": "Davi", "phone": "---" })).await;
    add_guest(app.clone(), &owner, project_id, serde_json::json!({ "name": "Eva" })).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/whatsapp/messages"),
        &owner,
        serde_json::json!({ "template": { "introduction": "Olá", "conclusion": "Confirme!" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await["summary"].clone();
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["successful"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["skipped"], 1);

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, format!("sprezzia-{project_id}"));
    assert_eq!(sent[0].1, "5511900000001");
    assert_eq!(sent[0].2, "Olá\n\nAna\nBruno\n\nConfirme!");

    assert_eq!(message_status(app.clone(), &owner, project_id, ok).await, "ENVIADA");
    assert_eq!(message_status(app.clone(), &owner, project_id, failing).await, "ERRO");
    assert_eq!(message_status(app, &owner, project_id, no_digits).await, "NAO_ENVIADA");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn broadcast_runs_past_request_timeout(pool: PgPool) {
    // 8 sends with 300 ms between them take over 2 s against a 1 s timeout.
    let mut config = test_config();
    config.request_timeout_secs = 1;
    config.whatsapp_send_delay_ms = 300;
    let gateway = Arc::new(FakeGateway::default());
    let app = build_test_app_with_config(pool, gateway.clone(), config);
    let owner = token("user_1");
    let project_id = create_project(app.clone(), &owner, "Casamento").await;

    for i in 1..=8 {
        add_guest(
            app.clone(),
            &owner,
            project_id,
            serde_json::json!({ "name": format!("Convidado {i}"), "phone": format!("1190000000{i}") }),
        )
        .await;
    }

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/whatsapp/messages"),
        &owner,
        serde_json::json!({ "simple_message": "Confirme sua presença" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await["summary"].clone();
    assert_eq!(summary["total"], 8);
    assert_eq!(summary["successful"], 8);
    assert_eq!(gateway.sent().len(), 8);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pending_audience_skips_answered_guests(pool: PgPool) {
    let gateway = Arc::new(FakeGateway::default());
    let app = build_test_app_with_gateway(pool, gateway.clone());
    let owner = token("user_1");
    let project_id = create_project(app.clone(), &owner, "Casamento").await;

    add_guest(app.clone(), &owner, project_id, serde_json::json!({ "name": "Ana", "phone": "11900000001" })).await;
    add_guest(
        app.clone(),
        &owner,
        project_id,
        serde_json::json!({ "name": "Bia", "phone": "11900000002", "status": "CONFIRMADO_PRESENCA" }),
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/whatsapp/messages"),
        &owner,
        serde_json::json!({ "target": "pending", "simple_message": "Responda o convite" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["summary"]["total"], 1);

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "5511900000001");
    assert_eq!(sent[0].2, "Responda o convite");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stored_template_is_the_fallback(pool: PgPool) {
    let gateway = Arc::new(FakeGateway::default());
    let app = build_test_app_with_gateway(pool, gateway.clone());
    let owner = token("user_1");
    let project_id = create_project(app.clone(), &owner, "Casamento").await;
    add_guest(app.clone(), &owner, project_id, serde_json::json!({ "name": "Ana", "phone": "11900000001" })).await;
    let messages = format!("/api/v1/projects/{project_id}/whatsapp/messages");

    let response = post_json(app.clone(), &messages, &owner, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(gateway.sent().is_empty());

    put_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/whatsapp/config"),
        &owner,
        serde_json::json!({ "introduction": "Bem-vindos", "conclusion": "Beijos" }),
    )
    .await;

    let response = post_json(app, &messages, &owner, serde_json::json!({ "simple_message": "  " })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(gateway.sent()[0].2, "Bem-vindos\n\nAna\n\nBeijos");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn broadcast_on_foreign_project_is_403(pool: PgPool) {
    let gateway = Arc::new(FakeGateway::default());
    let app = build_test_app_with_gateway(pool, gateway.clone());
    let project_id = create_project(app.clone(), &token("user_1"), "Casamento").await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/whatsapp/messages"),
        &token("user_2"),
        serde_json::json!({ "simple_message": "oi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(gateway.sent().is_empty());
}
