//! Integration tests for user actions and point loading against mock webhooks.

use std::sync::Arc;

use locafinder::Error;
use locafinder::actions::{ActionKind, Actions, BookingForm, NotificationLevel};
use locafinder::model::{Point, PointStore};
use locafinder::net::{HttpClient, WebhookClient, WebhookEndpoints};
use parking_lot::Mutex;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn webhooks(server: &MockServer) -> WebhookClient {
    WebhookClient::new(
        HttpClient::new(),
        WebhookEndpoints::with_base(&format!("{}/webhook", server.uri())),
    )
}

fn shop() -> Point {
    Point::new("1", "Shop A")
        .at(105.0, 21.0)
        .with_address("Hanoi")
        .with_price(10.0)
        .with_area(40.0)
}

fn form() -> BookingForm {
    BookingForm {
        name: "An".into(),
        phone: "0901234567".into(),
        email: "an@example.com".into(),
        date: "2025-06-01".into(),
        time: "09:00".into(),
        note: String::new(),
    }
}

#[tokio::test]
async fn test_predict_parses_fenced_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/predict"))
        .and(body_partial_json(json!({"name": "Shop A", "address": "Hanoi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "output": "```json\n{\"predicted_price\":12,\"advice\":\"ok\"}\n```"
        }])))
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    let prediction = actions.predict(&shop()).await.expect("predict failed");

    assert_eq!(prediction.predicted_price, Some(12.0));
    assert_eq!(prediction.advice, "ok");
    assert!(!actions.is_loading(ActionKind::Predict));
    assert!(actions.notifications().is_empty());
}

#[tokio::test]
async fn test_predict_unparsable_output_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "no idea"})))
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    let err = actions.predict(&shop()).await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
    let notifications = actions.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].kind, ActionKind::Predict);
}

#[tokio::test]
async fn test_loading_flag_rolls_back_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/compare"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = transitions.clone();
    actions.loading_changed.connect(move |change| sink.lock().push(*change));

    let err = actions.compare("Shop A", "Office B").await.unwrap_err();

    assert!(matches!(err, Error::NetworkFailure(_)));
    assert!(!actions.is_loading(ActionKind::Compare));
    assert_eq!(
        *transitions.lock(),
        vec![(ActionKind::Compare, true), (ActionKind::Compare, false)]
    );
}

#[tokio::test]
async fn test_notifications_are_dismissable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/aichat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    assert!(actions.chat("hello").await.is_err());

    let id = actions.notifications()[0].id;
    assert!(actions.dismiss(id));
    assert!(!actions.dismiss(id));
    assert!(actions.notifications().is_empty());
}

#[tokio::test]
async fn test_compare_returns_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/compare"))
        .and(body_partial_json(json!({"prop1": "Shop A", "prop2": "Office B"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comparison": [
                {"name": "Shop A", "price": 10, "area": 40, "address": "Hanoi", "pricePerM2": 0.25},
                {"name": "Office B", "price": 20, "area": 80, "address": "HCMC", "pricePerM2": 0.25}
            ],
            "ai_advice": "Either works",
            "recommended": "Shop A"
        })))
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    let comparison = actions.compare("Shop A", "Office B").await.expect("compare failed");

    assert_eq!(comparison.comparison.len(), 2);
    assert_eq!(comparison.ai_advice, "Either works");
    assert_eq!(
        comparison.recommended_property().map(|p| p.address.as_str()),
        Some("Hanoi")
    );
}

#[tokio::test]
async fn test_incomplete_input_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));

    let mut incomplete = form();
    incomplete.date.clear();
    assert!(matches!(
        actions.book(&shop(), incomplete).await,
        Err(Error::UserInputIncomplete { ref fields }) if fields == &vec!["date"]
    ));
    assert!(matches!(
        actions.compare("Shop A", " ").await,
        Err(Error::UserInputIncomplete { .. })
    ));
    assert!(matches!(
        actions.chat("   ").await,
        Err(Error::UserInputIncomplete { .. })
    ));
    assert!(actions.notifications().is_empty());
}

#[tokio::test]
async fn test_booking_sends_form_and_point() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/booking"))
        .and(body_partial_json(json!({
            "name": "An",
            "phone": "0901234567",
            "point_name": "Shop A",
            "address": "Hanoi",
            "price": 10.0,
            "area": 40.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Workflow was started"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    actions.book(&shop(), form()).await.expect("booking failed");

    let notifications = actions.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Success);
    assert!(!actions.is_loading(ActionKind::Book));
}

#[tokio::test]
async fn test_chat_joins_outputs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook/aichat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"output": "Hello"}, {"output": "How can I help?"}])),
        )
        .mount(&mock_server)
        .await;

    let actions = Actions::new(webhooks(&mock_server));
    let reply = actions.chat("hi").await.expect("chat failed");
    assert_eq!(reply.as_deref(), Some("Hello\nHow can I help?"));
}

#[tokio::test]
async fn test_store_load_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/locafinder"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = webhooks(&mock_server);
    assert!(PointStore::fetch(&client).await.is_err());
    assert!(PointStore::load(&client).await.is_empty());
}

#[tokio::test]
async fn test_store_load_tolerates_loose_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhook/locafinder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"id": "1", "name": "Shop A", "lat": "21.0", "lng": 105.0, "address": "Hanoi",
             "type": "Shop", "price": "12", "area": 40, "pre": 3, "star": 7},
            {"name": "Unmapped", "lat": null, "lng": "n/a", "address": "HCMC"}
        ]})))
        .mount(&mock_server)
        .await;

    let store = PointStore::load(&webhooks(&mock_server)).await;

    assert_eq!(store.len(), 2);
    let first = &store.points()[0];
    assert_eq!(first.price, 12.0);
    assert_eq!(first.rating, Some(5.0));
    assert!(first.has_coordinate());
    let second = &store.points()[1];
    assert_eq!(second.id, "#1");
    assert!(!second.has_coordinate());
}
