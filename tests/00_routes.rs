use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

// Router wiring checks that need no database: the service card, 404s, and
// the auth gate in front of the gym-scoped API.

async fn body_json(res: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = res.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn root_serves_service_card() -> Result<()> {
    let app = gym_api::app();
    let res = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let payload = body_json(res).await?;
    assert!(payload["success"].as_bool().unwrap_or(false), "success=false: {}", payload);
    assert_eq!(payload["data"]["name"], "Gym API");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    let app = gym_api::app();
    let res = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn gym_api_requires_bearer_token() -> Result<()> {
    let app = gym_api::app();
    let res = app
        .oneshot(Request::builder().uri("/api/members").body(Body::empty())?)
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let payload = body_json(res).await?;
    assert_eq!(payload["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn status_check_requires_bearer_token() -> Result<()> {
    let app = gym_api::app();
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/members/status-check")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn every_entity_exposes_get_by_id() -> Result<()> {
    // Unauthenticated requests hit the auth gate, not the 404 fallback, so
    // a 401 here proves the route is wired.
    let id = "6f7af0f4-9ba2-4c3c-b0a3-0e0c2a4d9f11";
    for path in [
        format!("/api/members/{id}"),
        format!("/api/plans/{id}"),
        format!("/api/batches/{id}"),
        format!("/api/payments/{id}"),
        format!("/api/staff/{id}"),
        format!("/api/expenses/{id}"),
        format!("/api/enquiries/{id}"),
    ] {
        let app = gym_api::app();
        let res = app
            .oneshot(Request::builder().uri(&path).body(Body::empty())?)
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "GET {path}");
    }
    Ok(())
}

#[tokio::test]
async fn correction_and_edit_routes_are_wired() -> Result<()> {
    let id = "6f7af0f4-9ba2-4c3c-b0a3-0e0c2a4d9f11";
    for (method, path) in [
        ("PUT", format!("/api/payments/{id}")),
        ("DELETE", format!("/api/payments/{id}")),
        ("PUT", format!("/api/expenses/{id}")),
        ("PUT", format!("/api/enquiries/{id}")),
    ] {
        let app = gym_api::app();
        let res = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(&path)
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {path}");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_bearer_token_is_rejected() -> Result<()> {
    let app = gym_api::app();
    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/members")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
