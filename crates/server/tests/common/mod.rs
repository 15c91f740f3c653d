#![allow(dead_code)]
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, AuthConfig};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use server::routes::auth::{encode_token, Claims};

pub const SECRET: &str = "test-secret";

pub async fn test_db() -> DatabaseConnection {
    let db = models::db::connect_in_memory().await.expect("sqlite");
    migration::Migrator::up(&db, None).await.expect("migrate");
    db
}

pub fn test_config() -> AppConfig {
    AppConfig { auth: AuthConfig { jwt_secret: SECRET.into() }, ..Default::default() }
}

pub async fn build_app() -> (Router, DatabaseConnection) {
    let db = test_db().await;
    (server::startup::build_app(db.clone(), &test_config()), db)
}

pub fn token(roles: &[&str]) -> String {
    let exp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as usize + 3600;
    let claims = Claims { sub: "tester".into(), roles: roles.iter().map(|r| r.to_string()).collect(), exp };
    encode_token(SECRET, &claims).unwrap()
}

pub fn admin_token() -> String { token(&["ADMIN"]) }

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), headers)
}

pub async fn post_json(app: &Router, uri: &str, bearer: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = builder.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap();
    let (status, bytes, _) = send(app, req).await;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, json)
}

pub async fn seed_student(db: &DatabaseConnection, person_id: i32, name: &str) {
    models::person::ActiveModel { person_id: Set(person_id), num: Set(None), name: Set(Some(name.into())) }
        .insert(db)
        .await
        .unwrap();
    models::student::ActiveModel { person_id: Set(person_id), major: Set(Some("CS".into())), class_name: Set(Some("C1".into())) }
        .insert(db)
        .await
        .unwrap();
}

pub fn honor_workbook(rows: &[(f64, &str, &str, &str, &str)]) -> Vec<u8> {
    let mut wb = rust_xlsxwriter::Workbook::new();
    let ws = wb.add_worksheet();
    for (i, h) in ["荣誉ID", "荣誉名称", "获得时间", "荣誉等级", "颁发组织"].iter().enumerate() {
        ws.write_string(0, i as u16, *h).unwrap();
    }
    for (i, (id, name, time, level, org)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        ws.write_number(r, 0, *id).unwrap();
        ws.write_string(r, 1, *name).unwrap();
        ws.write_string(r, 2, *time).unwrap();
        ws.write_string(r, 3, *level).unwrap();
        ws.write_string(r, 4, *org).unwrap();
    }
    wb.save_to_buffer().unwrap()
}
