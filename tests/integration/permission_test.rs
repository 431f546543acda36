//! Integration tests for permission resolution and the permission gate.

mod helpers;

use http::StatusCode;

use helpers::GATED_PERMISSION;

fn permissions(body: &serde_json::Value) -> Vec<String> {
    body["permissions"]
        .as_array()
        .expect("permissions array")
        .iter()
        .map(|p| p.as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_domain_permissions_attached_after_sync() {
    let app = helpers::TestApp::new().await;
    app.store.grant("city.gov", GATED_PERMISSION).await;
    app.store.grant("city.gov", "view_events").await;
    app.sync_permissions().await;

    let token = app.register("ana@city.gov", "password123").await.token();
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(permissions(&me.body), vec!["manage_events", "view_events"]);
}

#[tokio::test]
async fn test_unmapped_domain_falls_back_to_public() {
    let app = helpers::TestApp::new().await;
    app.sync_permissions().await;

    let token = app.register("joe@example.com", "password123").await.token();
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(
        permissions(&me.body),
        vec!["view_events", "view_locations", "view_weather"]
    );
}

#[tokio::test]
async fn test_unsynced_cache_yields_empty_permissions() {
    let app = helpers::TestApp::new().await;

    let token = app.register("joe@example.com", "password123").await.token();
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(me.status, StatusCode::OK);
    assert!(permissions(&me.body).is_empty());
}

#[tokio::test]
async fn test_permission_gate() {
    let app = helpers::TestApp::new().await;
    app.store.grant("city.gov", GATED_PERMISSION).await;
    app.sync_permissions().await;

    let staff = app.register("ana@city.gov", "password123").await.token();
    let public = app.register("joe@example.com", "password123").await.token();

    let allowed = app.request("GET", "/api/events", None, Some(&staff)).await;
    assert_eq!(allowed.status, StatusCode::OK);

    let denied = app.request("GET", "/api/events", None, Some(&public)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(
        denied.error(),
        "No permission to perform this action: manage_events"
    );

    let anonymous = app.request("GET", "/api/events", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoked_grant_disappears_after_resync() {
    let app = helpers::TestApp::new().await;
    app.store.grant("city.gov", GATED_PERMISSION).await;
    app.store.grant("city.gov", "view_events").await;
    app.sync_permissions().await;

    let token = app.register("ana@city.gov", "password123").await.token();

    app.store.revoke_grant("city.gov", GATED_PERMISSION).await;
    app.sync_permissions().await;
    app.sync_permissions().await;

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(permissions(&me.body), vec!["view_events"]);

    let denied = app.request("GET", "/api/events", None, Some(&token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}
