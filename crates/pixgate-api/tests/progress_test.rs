//! Progress API integration tests.
//!
//! Run with: `cargo test -p pixgate-api --test progress_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, setup_test_app, FakeDrive};
use serde_json::Value;

fn order_form(customer: &str, order: &str, file_names: &[&str]) -> MultipartForm {
    let mut form = MultipartForm::new()
        .add_text("customerName", customer.to_string())
        .add_text("orderNumber", order.to_string());
    for name in file_names {
        form = form.add_part(
            "photos",
            Part::bytes(&b"jpeg bytes"[..])
                .file_name(name.to_string())
                .mime_type("image/jpeg"),
        );
    }
    form
}

#[tokio::test]
async fn test_unknown_upload_id_returns_404() {
    let app = setup_test_app(FakeDrive::default()).await;

    let response = app
        .client()
        .get(&api_path(&format!(
            "/upload-progress/{}",
            uuid::Uuid::new_v4()
        )))
        .await;

    assert_eq!(response.status_code(), 404);
    let json: Value = response.json();
    assert_eq!(json["error"], "Upload not found");
}

#[tokio::test]
async fn test_malformed_upload_id_returns_404() {
    let app = setup_test_app(FakeDrive::default()).await;

    let response = app
        .client()
        .get(&api_path("/upload-progress/not-a-uuid"))
        .await;

    assert_eq!(response.status_code(), 404);
    let json: Value = response.json();
    assert_eq!(json["error"], "Upload not found");
}

#[tokio::test]
async fn test_concurrent_orders_have_independent_records() {
    let app = setup_test_app(FakeDrive::default()).await;

    let (first, second) = tokio::join!(
        app.client()
            .post(&api_path("/upload-photos"))
            .multipart(order_form("Jane", "ORD-1", &["a.jpg", "b.jpg"])),
        app.client()
            .post(&api_path("/upload-photos"))
            .multipart(order_form("John", "ORD-2", &["x.jpg", "y.jpg", "z.jpg"])),
    );

    assert_eq!(first.status_code(), 200);
    assert_eq!(second.status_code(), 200);

    let first_id = first.json::<Value>()["uploadId"]
        .as_str()
        .unwrap()
        .to_string();
    let second_id = second.json::<Value>()["uploadId"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first_id, second_id);

    let first_progress: Value = app
        .client()
        .get(&api_path(&format!("/upload-progress/{}", first_id)))
        .await
        .json();
    let second_progress: Value = app
        .client()
        .get(&api_path(&format!("/upload-progress/{}", second_id)))
        .await
        .json();

    assert_eq!(first_progress["total"], 2);
    assert_eq!(first_progress["completed"], 2);
    assert_eq!(second_progress["total"], 3);
    assert_eq!(second_progress["completed"], 3);
}
