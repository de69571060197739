mod common;

use linkhub::domain::click_event::ClickTarget;
use serde_json::json;

#[tokio::test]
async fn test_track_click_queues_event() {
    let mut ctx = common::create_test_context();
    let page = common::create_test_page(&ctx.state, "creator").await;
    let item = common::create_test_item(&ctx.state, page.id, "Blog").await;
    let server = common::test_server(ctx.state.clone());

    let response = server.post(&format!("/api/track-click/{}", item.id)).await;

    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));

    let events = common::drain_clicks(&mut ctx.clicks);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target, ClickTarget::ListItem(item.id));
}

#[tokio::test]
async fn test_track_click_unknown_item_still_succeeds() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state);

    let response = server.post("/api/track-click/999").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));
}

#[tokio::test]
async fn test_track_click_malformed_id_is_noop() {
    let mut ctx = common::create_test_context();
    let server = common::test_server(ctx.state.clone());

    for id in ["abc", "0", "-4"] {
        let response = server.post(&format!("/api/track-click/{id}")).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));
    }

    assert!(common::drain_clicks(&mut ctx.clicks).is_empty());
}
