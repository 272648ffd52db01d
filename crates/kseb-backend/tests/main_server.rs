//! Main-server client tests against a mock server.

use chrono::NaiveDateTime;
use kseb_backend::MainServerClient;
use kseb_core::{
    BackendError, BackendPort, EventChanges, NewEvent, ScheduleScope, format_transcript,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "jwt-abc";

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

async fn setup() -> (MockServer, MainServerClient) {
    let server = MockServer::start().await;
    let client = MainServerClient::new(server.uri()).unwrap();
    (server, client)
}

#[tokio::test]
async fn channel_messages_are_parsed_and_formatted() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/channels/5/chats"))
        .and(header("authorization", "Bearer jwt-abc"))
        .and(header("x-user-id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"createdAt": "2025-08-01T10:15:00", "userName": "민수", "content": "안건 정리했어요"},
                {"createdAt": "2025-08-01T10:16:30.123", "userName": "지현", "content": null}
            ]
        })))
        .mount(&server)
        .await;

    let messages = client.channel_messages(5, 42, TOKEN).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        format_transcript(&messages),
        "[2025-08-01 10:15] 민수: 안건 정리했어요\n[2025-08-01 10:16] 지현: (파일)"
    );
}

#[tokio::test]
async fn channel_error_exposes_message_detail() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/channels/5/chats"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "채널 멤버가 아닙니다."})),
        )
        .mount(&server)
        .await;

    let err = client.channel_messages(5, 42, TOKEN).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 403, .. }));
    assert_eq!(err.detail(), "채널 멤버가 아닙니다.");
}

#[tokio::test]
async fn list_events_sends_date_range() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/groups/3/events"))
        .and(query_param("startDate", "2025-08-04T00:00:00"))
        .and(query_param("endDate", "2025-08-04T23:59:59"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"eventId": 1}]})))
        .mount(&server)
        .await;

    let events = client
        .list_events(
            ScheduleScope::Group(3),
            Some((dt("2025-08-04 00:00:00"), dt("2025-08-04 23:59:59"))),
            TOKEN,
        )
        .await
        .unwrap();
    assert_eq!(events["data"][0]["eventId"], 1);
}

#[tokio::test]
async fn create_event_posts_payload() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users/me/events"))
        .and(body_json(json!({
            "title": "스터디",
            "startDatetime": "2025-08-02T15:00:00",
            "endDatetime": "2025-08-02T16:00:00",
            "allDay": false,
            "themeColor": "#3b82f6"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"eventId": 77}})))
        .mount(&server)
        .await;

    let event = NewEvent::timed("스터디", "2025-08-02T15:00:00", "2025-08-02T16:00:00");
    let created = client
        .create_event(ScheduleScope::Personal, &event, TOKEN)
        .await
        .unwrap();
    assert_eq!(created["data"]["eventId"], 77);
}

#[tokio::test]
async fn update_event_patches_only_changes() {
    let (server, client) = setup().await;
    Mock::given(method("PATCH"))
        .and(path("/api/groups/3/events/9"))
        .and(body_json(json!({"title": "변경된 회의"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let changes = EventChanges {
        title: Some("변경된 회의".to_string()),
        ..Default::default()
    };
    client
        .update_event(ScheduleScope::Group(3), 9, &changes, TOKEN)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_no_content_maps_to_success() {
    let (server, client) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/me/events/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client
        .delete_event(ScheduleScope::Personal, 9, TOKEN)
        .await
        .unwrap();
    assert_eq!(result, json!({"success": true}));
}

#[tokio::test]
async fn group_schedules_sends_window() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/groups/3/events/all-schedules"))
        .and(query_param("from", "2025-08-04T00:00:00"))
        .and(query_param("to", "2025-08-11T00:00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"personalEvents": [], "groupEvents": []}
        })))
        .mount(&server)
        .await;

    let bundle = client
        .group_schedules(3, dt("2025-08-04 00:00:00"), dt("2025-08-11 00:00:00"), TOKEN)
        .await
        .unwrap();
    assert!(bundle["data"]["groupEvents"].is_array());
}

#[tokio::test]
async fn server_error_renders_status_and_body() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/events"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client
        .list_events(ScheduleScope::Personal, None, TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API 오류: 500 - boom");
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let client = MainServerClient::new("http://127.0.0.1:1").unwrap();
    let err = client.channel_messages(1, 1, TOKEN).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}
