mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::{Value, json};

use common::setup;
use wichtel_backend::middlewares::access_log::redact_path;

macro_rules! init_app {
    ($app:expr) => {{
        let services = $app.services.clone();
        test::init_service(App::new().configure(move |cfg| services.configure(cfg))).await
    }};
}

#[actix_web::test]
async fn test_health() {
    let app = setup().await;
    let service = init_app!(app);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[actix_web::test]
async fn test_full_flow_over_http() {
    let app = setup().await;
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/v1/events")
        .set_json(json!({
            "name": "Familienwichteln",
            "date": "2025-12-24",
            "budget": 25,
            "admin_pin": "5150"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["event"]["state"], "open");
    let code = created["data"]["event_code"].as_str().unwrap().to_string();
    let admin_secret = created["data"]["admin_secret"].as_str().unwrap().to_string();

    let mut tokens = Vec::new();
    for (name, email) in [
        ("Anna", "anna@example.de"),
        ("Ben", "ben@example.de"),
        ("Carla", "carla@example.de"),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/events/{code}/participants"))
            .set_json(json!({ "name": name, "email": email, "wishlist": "Tee" }))
            .to_request();
        let joined: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(joined["data"]["participant"]["avatar"], "🎅");
        tokens.push(joined["data"]["secret_token"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/events/{code}"))
        .to_request();
    let public: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(public["data"]["participant_count"], 3);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/{admin_secret}/draw"))
        .to_request();
    let drawn: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(drawn["data"]["state"], "drawn");
    assert_eq!(drawn["data"]["pair_count"], 3);
    assert!(drawn["data"].get("pairs").is_none());

    let mut receivers = Vec::new();
    for token in &tokens {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/participants/{token}/receiver"))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        receivers.push(body["data"]["id"].as_str().unwrap().to_string());
    }
    receivers.sort();
    receivers.dedup();
    assert_eq!(receivers.len(), 3);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/participants/{}/wishlist", tokens[0]))
        .set_json(json!({ "wishlist": "Kaffee" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(updated["data"]["wishlist"], "Kaffee");
}

#[actix_web::test]
async fn test_error_envelopes() {
    let app = setup().await;
    let event = app.create_event("6001").await;
    app.join(&event.event_code, "Anna").await;
    let service = init_app!(app);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/participants/{}", "x".repeat(32)))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/{}/draw", event.admin_secret))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/v1/events")
        .set_json(json!({
            "name": "Zweites",
            "date": "2025-12-24",
            "admin_pin": "6001"
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/login")
        .set_json(json!({ "pin": "12" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_logins_over_http() {
    let app = setup().await;
    let event = app.create_event("6002").await;
    let anna = app
        .services
        .participants
        .register(&event.event_code, common::participant_request("Anna", Some("2468")))
        .await
        .unwrap();
    let service = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/login")
        .set_json(json!({ "pin": "6002" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["data"]["admin_secret"], event.admin_secret.as_str());

    let req = test::TestRequest::post()
        .uri("/api/v1/participants/login")
        .set_json(json!({
            "event_code": event.event_code,
            "email": "anna@example.de",
            "pin": "2468"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["data"]["secret_token"], anna.secret_token.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/{}", event.admin_secret))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["data"]["participant_count"], 1);
    assert_eq!(body["data"]["participants"][0]["has_assignment"], false);
}

#[actix_web::test]
async fn test_padded_tokens_are_neither_accepted_nor_logged() {
    let app = setup().await;
    let event = app.create_event("6003").await;
    let anna = app.join(&event.event_code, "Anna").await;
    app.join(&event.event_code, "Ben").await;
    let service = init_app!(app);

    let uris = [
        format!("/api/v1/participants/{}%20", anna.secret_token),
        format!("/api/v1/participants/%20{}/receiver", anna.secret_token),
        format!("/api/v1/admin/{}%20", event.admin_secret),
        format!("/api/v1/admin/{}%09/draw", event.admin_secret),
    ];
    for uri in &uris {
        let req = if uri.ends_with("/draw") {
            test::TestRequest::post().uri(uri).to_request()
        } else {
            test::TestRequest::get().uri(uri).to_request()
        };
        let path = req.path().to_string();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");

        let logged = redact_path(&path);
        assert!(!logged.contains(&anna.secret_token), "{logged}");
        assert!(!logged.contains(&event.admin_secret), "{logged}");
    }

    // the exact token still works
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/participants/{}", anna.secret_token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
