//! Integration tests for the authentication flow.

mod helpers;

use std::time::Duration;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_signs_user_in() {
    let app = helpers::TestApp::new().await;
    let registered = app.register("ana@city.gov", "password123").await;

    assert_eq!(
        registered.body["message"],
        "User registered and logged in successfully"
    );
    assert_eq!(registered.body["user"]["email"], "ana@city.gov");
    assert_eq!(registered.body["user"]["domain"], "city.gov");
    assert!(registered.body["user"].get("passwordHash").is_none());
    assert!(registered.body["refreshExpiresAt"].as_i64().unwrap()
        > registered.body["accessExpiresAt"].as_i64().unwrap());

    let me = app
        .request("GET", "/api/auth/me", None, Some(&registered.token()))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["email"], "ana@city.gov");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = helpers::TestApp::new().await;
    app.register("ana@city.gov", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "firstName": "Ana",
                "lastName": "Lima",
                "email": "ANA@city.gov",
                "password": "password123",
                "phoneNumber": "5550100",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error(), "Email already in use");
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = helpers::TestApp::new().await;

    let missing = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "ana@city.gov", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error(), "Missing required user data fields");

    let short = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "firstName": "Ana",
                "lastName": "Lima",
                "email": "ana@city.gov",
                "password": "short",
                "phoneNumber": "5550100",
            })),
            None,
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.error(), "Password must be at least 8 characters long");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = helpers::TestApp::new().await;
    app.register("ana@city.gov", "password123").await;

    let wrong_password = app.login("ana@city.gov", "wrongpassword").await;
    let unknown_email = app.login("nobody@city.gov", "password123").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.error(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@city.gov" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Email and password are required");
}

#[tokio::test]
async fn test_login_success() {
    let app = helpers::TestApp::new().await;
    app.register("ana@city.gov", "password123").await;

    let response = app.login("ana@city.gov", "password123").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert!(response.body.get("token").is_some());
    assert!(response.body.get("refreshToken").is_some());
}

#[tokio::test]
async fn test_authorization_header_scenarios() {
    let app = helpers::TestApp::new().await;

    let cases = [
        (None, "No token provided"),
        (Some("Bearer"), "Token error"),
        (Some("Bearer a b"), "Token error"),
        (Some("Token abc"), "Token malformatted"),
        (Some("Bearer not-a-session"), "Session expired or invalid"),
    ];

    for (header, expected) in cases {
        let response = app
            .request_with_header("GET", "/api/auth/me", None, header)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{header:?}");
        assert_eq!(response.error(), expected, "{header:?}");
    }
}

#[tokio::test]
async fn test_logout_revokes_session_and_refresh_token() {
    let app = helpers::TestApp::new().await;
    let registered = app.register("ana@city.gov", "password123").await;
    let token = registered.token();
    let refresh_token = registered.refresh_token();

    let logout = app
        .request(
            "POST",
            "/api/auth/logout",
            Some(json!({ "refreshToken": refresh_token })),
            Some(&token),
        )
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["message"], "Logged out successfully");

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.error(), "Session expired or invalid");

    let refresh = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refresh.error(), "Invalid refresh token");
}

#[tokio::test]
async fn test_logout_without_body() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ana@city.gov", "password123").await.token();

    let logout = app.request("POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(logout.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_reuses_refresh_token() {
    let app = helpers::TestApp::new().await;
    let registered = app.register("ana@city.gov", "password123").await;
    let original_access = registered.token();
    let refresh_token = registered.refresh_token();

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert_eq!(refreshed.refresh_token(), refresh_token);
    assert_eq!(
        refreshed.body["refreshExpiresAt"],
        registered.body["refreshExpiresAt"]
    );
    assert_ne!(refreshed.token(), original_access);

    for token in [refreshed.token(), original_access] {
        let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
        assert_eq!(me.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_refresh_after_expiry_fails() {
    let app = helpers::TestApp::new().await;
    let refresh_token = app
        .register("ana@city.gov", "password123")
        .await
        .refresh_token();

    app.clock
        .advance(Duration::from_secs(app.config.auth.refresh_ttl_seconds()));

    let refresh = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refresh.error(), "Refresh token expired");
}

#[tokio::test]
async fn test_refresh_requires_token() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request("POST", "/api/auth/refresh", Some(json!({})), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "No refresh token provided");
}

#[tokio::test]
async fn test_change_password_revokes_prior_sessions() {
    let app = helpers::TestApp::new().await;
    let first = app.register("ana@city.gov", "password123").await.token();
    let second = app.login("ana@city.gov", "password123").await.token();

    let changed = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({ "oldPassword": "password123", "newPassword": "newpassword456" })),
            Some(&first),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK, "{}", changed.body);
    assert_eq!(changed.body["message"], "Password changed successfully");

    for token in [first, second] {
        let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
        assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    }

    let me = app
        .request("GET", "/api/auth/me", None, Some(&changed.token()))
        .await;
    assert_eq!(me.status, StatusCode::OK);

    assert_eq!(
        app.login("ana@city.gov", "password123").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("ana@city.gov", "newpassword456").await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_change_password_ends_old_refresh_tokens() {
    let app = helpers::TestApp::new().await;
    let registered = app.register("ana@city.gov", "password123").await;
    let old_refresh = registered.refresh_token();

    let changed = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({ "oldPassword": "password123", "newPassword": "newpassword456" })),
            Some(&registered.token()),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK, "{}", changed.body);

    let stale = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": old_refresh })),
            None,
        )
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.error(), "Invalid refresh token");

    let current = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": changed.refresh_token() })),
            None,
        )
        .await;
    assert_eq!(current.status, StatusCode::OK, "{}", current.body);
}

#[tokio::test]
async fn test_change_password_wrong_old_password() {
    let app = helpers::TestApp::new().await;
    let token = app.register("ana@city.gov", "password123").await.token();

    let changed = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({ "oldPassword": "not-it-at-all", "newPassword": "newpassword456" })),
            Some(&token),
        )
        .await;
    assert_eq!(changed.status, StatusCode::UNAUTHORIZED);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_up() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["database"], "up");
    assert_eq!(response.body["cache"], "up");
}

#[tokio::test]
async fn test_health_reports_store_outage() {
    let app = helpers::TestApp::new().await;
    app.store.set_unavailable(true);

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["database"], "down");
}
