use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use futures_util::StreamExt;
use serde_json::{json, Value};
use showtime_api::{app, AppState};
use showtime_catalog::PricingConfig;
use showtime_store::app_config::{BookingRules, Config, IdConfig, NotificationConfig, ServerConfig};
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> Router {
    let config = Config {
        server: ServerConfig { port: 0 },
        booking: BookingRules::default(),
        pricing: PricingConfig::default(),
        notification: NotificationConfig::default(),
        ids: IdConfig::default(),
    };
    app(AppState::from_config(&config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// City, theater and a Saturday show with seats A1..A3. Returns the show id.
async fn seed_show(app: &Router) -> String {
    let (status, city) = send(app, Method::POST, "/v1/cities", Some(json!({ "name": "Pune" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, theater) = send(
        app,
        Method::POST,
        "/v1/theaters",
        Some(json!({ "name": "PVR Phoenix", "city_id": city["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, show) = send(
        app,
        Method::POST,
        "/v1/shows",
        Some(json!({
            "movie_name": "Inception",
            "theater_id": theater["id"],
            "start_time": "2026-10-17T18:30:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let show_id = show["id"].as_str().unwrap().to_string();

    let (status, added) = send(
        app,
        Method::POST,
        &format!("/v1/shows/{}/seats", show_id),
        Some(json!({ "seat_ids": ["A1", "A2", "A3"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["added"], 3);

    show_id
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_reserve_conflict_confirm_flow() {
    let app = test_app();
    let show_id = seed_show(&app).await;

    let (status, reservation) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": show_id, "seat_ids": ["A1", "A2"], "recipient": "alice@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reservation_id = reservation["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": show_id, "seat_ids": ["A2", "A3"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("A2"));

    let confirm_uri = format!("/v1/reservations/{}/confirm", reservation_id);
    let (status, receipt) = send(&app, Method::POST, &confirm_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["total_amount"], 2000);
    assert_eq!(receipt["seat_ids"], json!(["A1", "A2"]));

    let (status, _) = send(&app, Method::POST, &confirm_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let booking_uri = format!("/v1/bookings/{}", receipt["booking_id"].as_str().unwrap());
    let (status, booking) = send(&app, Method::GET, &booking_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking, receipt);

    let (status, seats) = send(&app, Method::GET, &format!("/v1/shows/{}/seats", show_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seats.as_array().unwrap().len(), 1);
    assert_eq!(seats[0]["id"], "A3");
    assert_eq!(seats[0]["status"], "AVAILABLE");
}

#[tokio::test]
async fn test_cancel_releases_seats() {
    let app = test_app();
    let show_id = seed_show(&app).await;

    let (_, reservation) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": show_id, "seat_ids": ["A3"], "ttl_seconds": 60 })),
    )
    .await;
    let uri = format!("/v1/reservations/{}", reservation["id"].as_str().unwrap());

    let (status, pending) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["seat_ids"], json!(["A3"]));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, seats) = send(&app, Method::GET, &format!("/v1/shows/{}/seats?all=true", show_id), None).await;
    assert!(seats
        .as_array()
        .unwrap()
        .iter()
        .all(|seat| seat["status"] == "AVAILABLE"));
}

#[tokio::test]
async fn test_reserve_rejections() {
    let app = test_app();
    let show_id = seed_show(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": "no-such-show", "seat_ids": ["A1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": show_id, "seat_ids": ["A1"], "ttl_seconds": 86400 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": show_id, "seat_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/v1/bookings/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_search() {
    let app = test_app();
    seed_show(&app).await;

    let (status, cities) = send(&app, Method::GET, "/v1/cities?name=pu", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cities[0]["name"], "Pune");

    let (_, shows) = send(&app, Method::GET, "/v1/shows?movie=incep&date=2026-10-17", None).await;
    assert_eq!(shows.as_array().unwrap().len(), 1);

    let (_, shows) = send(&app, Method::GET, "/v1/shows?movie=incep&date=2026-10-18", None).await;
    assert!(shows.as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/theaters",
        Some(json!({ "name": "Nowhere", "city_id": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_hold_comes_from_manager() {
    let app = test_app();
    let show_id = seed_show(&app).await;

    let (status, reservation) = send(
        &app,
        Method::POST,
        "/v1/reservations",
        Some(json!({ "show_id": show_id, "seat_ids": ["A1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let created: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(reservation["created_at"].clone()).unwrap();
    let expires: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(reservation["expires_at"].clone()).unwrap();
    let held = (expires - created).num_seconds();
    assert!((299..=300).contains(&held), "held for {held}s");
}

#[tokio::test]
async fn test_show_event_stream_is_filtered_by_show() {
    let app = test_app();
    let watched = seed_show(&app).await;
    let other = seed_show(&app).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/v1/shows/{}/events", watched))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    let mut body = response.into_body().into_data_stream();

    // Other show first, so a missing filter would surface it before ours
    for show_id in [&other, &watched] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/v1/reservations",
            Some(json!({ "show_id": show_id, "seat_ids": ["A1"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut frame = String::new();
    while !frame.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .expect("no event within 5s")
            .expect("stream ended")
            .unwrap();
        frame.push_str(std::str::from_utf8(&chunk).unwrap());
    }

    assert!(frame.contains("event: seats_held"), "{frame}");
    let data = frame
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let event: Value = serde_json::from_str(data).unwrap();
    assert_eq!(event["type"], "SEATS_HELD");
    assert_eq!(event["show_id"], watched.as_str());
    assert_eq!(event["seat_ids"], json!(["A1"]));
}
