mod common;

use reqwest::{Method, StatusCode};
use serde_json::json;

const REPORT: &str = "/functions/v1/generate-payment-report";
const NOTIFY: &str = "/functions/v1/send-whatsapp-notification";

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    common::cleanup(app).await;
}

// ── Auth ────────────────────────────────────────────────────────

#[tokio::test]
async fn register_bootstrap_admin_then_closes() {
    let app = common::spawn_app().await;

    let (body, status) = app.register("admin@test.com", "password123", "Admin TU").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert_eq!(body["profile"]["role"], "admin");
    assert!(body["profile"].get("password_hash").is_none());

    let (body, status) = app.register("other@test.com", "password123", "Other").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("disabled"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = common::spawn_app().await;

    let (_, status) = app.register("admin@test.com", "short", "Admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn login_checks_password() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.login("admin@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (_, status) = app.login("admin@test.com", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, status) = app.login("nobody@test.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn api_requires_token() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/api/v1/students")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn parents_cannot_use_office_api() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (_, status) = app
        .post_auth(
            "/api/v1/profiles",
            &token,
            &json!({
                "full_name": "Ibu Sari",
                "phone": "081200000001",
                "email": "sari@test.com",
                "password": "password123",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (body, _) = app.login("sari@test.com", "password123").await;
    let parent_token = body["access_token"].as_str().unwrap();

    let (_, status) = app.get_auth("/api/v1/students", parent_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

// ── Students ────────────────────────────────────────────────────

#[tokio::test]
async fn students_lifecycle() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let guardian = app.create_guardian(&token, "Pak Budi", Some("081234567890")).await;
    let student = app
        .create_student(&token, "Andi", "1001", "7A", guardian["id"].as_str())
        .await;
    let id = student["id"].as_str().unwrap();
    assert_eq!(student["is_active"], true);
    assert_eq!(student["monthly_fee"], json!(150000.0));

    let (body, status) = app.get_auth("/api/v1/students", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["guardian_phone"], "081234567890");

    let (body, status) = app
        .put_auth(
            &format!("/api/v1/students/{id}"),
            &token,
            &json!({
                "name": "Andi",
                "nis": "1001",
                "class": "8A",
                "academic_year": "2025/2026",
                "monthly_fee": "175000",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"], "8A");
    assert_eq!(body["monthly_fee"], json!(175000.0));

    let (body, status) = app
        .post_auth(&format!("/api/v1/students/{id}/deactivate"), &token, &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    // Still listed: students are never deleted
    let (body, _) = app.get_auth(&format!("/api/v1/students/{id}"), &token).await;
    assert_eq!(body["is_active"], false);

    common::cleanup(app).await;
}

#[tokio::test]
async fn duplicate_nis_conflicts() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_student(&token, "Andi", "1001", "7A", None).await;
    let (_, status) = app
        .post_auth(
            "/api/v1/students",
            &token,
            &json!({
                "name": "Andika",
                "nis": "1001",
                "class": "7B",
                "academic_year": "2024/2025",
                "monthly_fee": 150000,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::cleanup(app).await;
}

// ── Payments ────────────────────────────────────────────────────

#[tokio::test]
async fn payment_rejects_negative_amount_and_unknown_student() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let student = app.create_student(&token, "Andi", "1001", "7A", None).await;

    let mut body = json!({
        "student_id": student["id"],
        "amount": -5,
        "payment_method": "cash",
        "due_date": "2024-07-10",
        "month_year": "Juli 2024",
    });
    let (_, status) = app.post_auth("/api/v1/payments", &token, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    body["amount"] = json!(150000);
    body["student_id"] = json!(uuid::Uuid::now_v7());
    let (_, status) = app.post_auth("/api/v1/payments", &token, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn payment_status_transitions() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let student = app.create_student(&token, "Andi", "1001", "7A", None).await;
    let payment = app
        .create_payment(
            &token,
            student["id"].as_str().unwrap(),
            150000,
            "2024-07-05",
            "Juli 2024",
            "pending",
        )
        .await;
    let path = format!("/api/v1/payments/{}/status", payment["id"].as_str().unwrap());

    let (body, status) = app.put_auth(&path, &token, &json!({ "status": "overdue" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "overdue");

    let (_, status) = app.put_auth(&path, &token, &json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (body, status) = app.put_auth(&path, &token, &json!({ "status": "paid" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");

    let (body, status) = app.put_auth(&path, &token, &json!({ "status": "overdue" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("from paid to overdue"));

    common::cleanup(app).await;
}

// ── Report function ─────────────────────────────────────────────

#[tokio::test]
async fn report_preflight_returns_cors_headers() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .request(Method::OPTIONS, app.url(REPORT))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(resp.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .contains("authorization"));
    assert!(resp.text().await.unwrap().is_empty());

    common::cleanup(app).await;
}

#[tokio::test]
async fn report_summary_on_empty_range_is_zero() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (body, status) = app
        .post_auth(
            REPORT,
            &token,
            &json!({ "startDate": "2024-01-01", "endDate": "2024-12-31", "reportType": "summary" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["generatedAt"].is_string());

    let data = &body["data"];
    assert_eq!(data["totalPayments"], 0);
    assert_eq!(data["totalAmount"], json!(0.0));
    assert_eq!(data["paidCount"], 0);
    assert_eq!(data["pendingCount"], 0);
    assert_eq!(data["overdueCount"], 0);
    assert_eq!(data["byMonth"], json!({}));
    assert_eq!(data["byClass"], json!({}));

    common::cleanup(app).await;
}

#[tokio::test]
async fn report_summary_groups_range() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let andi = app.create_student(&token, "Andi", "1001", "7A", None).await;
    let budi = app.create_student(&token, "Budi", "1002", "8B", None).await;
    let andi_id = andi["id"].as_str().unwrap();
    let budi_id = budi["id"].as_str().unwrap();

    app.create_payment(&token, andi_id, 150000, "2024-07-05", "Juli 2024", "paid").await;
    app.create_payment(&token, budi_id, 175000, "2024-07-31", "Juli 2024", "pending").await;
    app.create_payment(&token, andi_id, 150000, "2024-08-02", "Agustus 2024", "overdue").await;
    // Outside the range
    app.create_payment(&token, budi_id, 175000, "2024-09-01", "September 2024", "paid").await;

    let (body, status) = app
        .post_auth(
            REPORT,
            &token,
            &json!({ "startDate": "2024-07-01", "endDate": "2024-08-31", "reportType": "summary" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let data = &body["data"];
    assert_eq!(data["totalPayments"], 3);
    assert_eq!(data["totalAmount"], json!(475000.0));
    assert_eq!(data["paidCount"], 1);
    assert_eq!(data["pendingCount"], 1);
    assert_eq!(data["overdueCount"], 1);
    assert_eq!(data["byMonth"]["Juli 2024"], json!({ "count": 2, "total": 325000.0 }));
    assert_eq!(data["byMonth"]["Agustus 2024"], json!({ "count": 1, "total": 150000.0 }));
    assert_eq!(data["byClass"]["7A"], json!({ "count": 2, "total": 300000.0 }));
    assert_eq!(data["byClass"]["8B"], json!({ "count": 1, "total": 175000.0 }));

    common::cleanup(app).await;
}

#[tokio::test]
async fn report_detailed_is_flat_and_newest_first() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let andi = app.create_student(&token, "Andi", "1001", "7A", None).await;
    let id = andi["id"].as_str().unwrap();

    app.create_payment(&token, id, 150000, "2024-07-05", "Juli 2024", "paid").await;
    app.create_payment(&token, id, 150000, "2024-08-05", "Agustus 2024", "pending").await;

    let (body, status) = app
        .post_auth(
            REPORT,
            &token,
            &json!({ "startDate": "2024-07-05", "endDate": "2024-08-05", "reportType": "detailed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["data"]["payments"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["paymentDate"], "2024-08-05");
    assert_eq!(rows[0]["studentName"], "Andi");
    assert_eq!(rows[0]["studentNis"], "1001");
    assert_eq!(rows[0]["class"], "7A");
    assert_eq!(rows[0]["academicYear"], "2024/2025");
    assert_eq!(rows[0]["paymentMethod"], "transfer");
    assert_eq!(rows[1]["monthYear"], "Juli 2024");

    common::cleanup(app).await;
}

#[tokio::test]
async fn report_rejects_unknown_type() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let resp = app
        .client
        .post(app.url(REPORT))
        .bearer_auth(&token)
        .json(&json!({ "startDate": "2024-01-01", "endDate": "2024-12-31", "reportType": "monthly" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Invalid report type" }));

    common::cleanup(app).await;
}

#[tokio::test]
async fn report_rejects_malformed_body() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let resp = app
        .client
        .post(app.url(REPORT))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    common::cleanup(app).await;
}

// ── Notification function ───────────────────────────────────────

#[tokio::test]
async fn notification_preflight_returns_cors_headers() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .request(Method::OPTIONS, app.url(NOTIFY))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(resp.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .contains("content-type"));
    assert!(resp.text().await.unwrap().is_empty());

    common::cleanup(app).await;
}

#[tokio::test]
async fn notification_skips_students_without_phone() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let with_phone = app.create_guardian(&token, "Pak Budi", Some("081234567890")).await;
    let also_phone = app.create_guardian(&token, "Bu Ani", Some("081298765432")).await;
    let no_phone = app.create_guardian(&token, "Pak Dedi", None).await;

    let s1 = app.create_student(&token, "Andi", "1001", "7A", with_phone["id"].as_str()).await;
    let s2 = app.create_student(&token, "Citra", "1002", "7B", also_phone["id"].as_str()).await;
    let s3 = app.create_student(&token, "Dodi", "1003", "7C", no_phone["id"].as_str()).await;

    let (body, status) = app
        .post_auth(
            NOTIFY,
            &token,
            &json!({
                "studentIds": [s1["id"], s2["id"], s3["id"]],
                "message": "Mohon segera melunasi SPP bulan Juli",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successfully sent 2 WhatsApp notifications");

    let sent = body["notifications"].as_array().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n["status"] == "sent"));
    assert!(sent.iter().all(|n| n["sentAt"].is_string()));
    assert!(sent.iter().any(|n| n["parentName"] == "Pak Budi" && n["phone"] == "081234567890"));
    assert!(sent.iter().all(|n| n["studentName"] != "Dodi"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn notification_rejects_bad_ids() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (body, status) = app
        .post_auth(NOTIFY, &token, &json!({ "studentIds": ["abc"], "message": "hi" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    common::cleanup(app).await;
}

// ── Dashboard ───────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_stats_and_page() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let mut ids = Vec::new();
    for i in 0..10 {
        let student = app
            .create_student(&token, &format!("Siswa {i}"), &format!("20{i:02}"), "9A", None)
            .await;
        ids.push(student["id"].as_str().unwrap().to_string());
    }
    for id in &ids[..4] {
        app.create_payment(&token, id, 150000, "2024-07-05", "Juli 2024", "paid").await;
    }
    app.create_payment(&token, &ids[4], 150000, "2024-07-06", "Juli 2024", "overdue").await;
    app.create_payment(&token, &ids[5], 150000, "2024-07-07", "Juli 2024", "pending").await;

    let (body, status) = app.get_auth("/api/v1/dashboard/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_students"], 10);
    assert_eq!(body["paid_count"], 4);
    assert_eq!(body["unpaid_count"], 2);
    assert_eq!(body["total_collected"], json!(600000.0));
    assert_eq!(body["total_overdue"], json!(150000.0));
    assert_eq!(body["paid_percentage_label"], "40.0% dari total");
    assert_eq!(body["recent_payments"].as_array().unwrap().len(), 4);
    assert_eq!(body["recent_payments"][0]["status_label"], "Tunggakan");

    let resp = app
        .client
        .get(app.url("/dashboard"))
        .header("cookie", format!("access_token={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("40.0% dari total"));
    assert!(html.contains("Rp\u{a0}600.000,00"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn dashboard_redirects_without_session() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/auth/login");

    common::cleanup(app).await;
}

#[tokio::test]
async fn login_page_starts_without_error_message() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/auth/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains(r#"<p class="error" id="login-error"></p>"#));
    assert!(html.contains("/api/v1/auth/login"));

    common::cleanup(app).await;
}
