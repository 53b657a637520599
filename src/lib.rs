pub mod auth;
pub mod billing;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod reconciler;
pub mod reports;
pub mod scheduler;

use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Full application router. Public auth routes plus the gym-scoped API
/// behind the JWT middleware.
pub fn app() -> Router {
    let protected = Router::new()
        .merge(member_routes())
        .merge(plan_routes())
        .merge(batch_routes())
        .merge(payment_routes())
        .merge(attendance_routes())
        .merge(staff_routes())
        .merge(expense_routes())
        .merge(enquiry_routes())
        .merge(report_routes())
        .route_layer(axum::middleware::from_fn(
            middleware::auth::jwt_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Gym-scoped API
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/login", post(auth::login))
}

fn member_routes() -> Router {
    use handlers::{members, status_check};

    Router::new()
        .route("/api/members", get(members::list).post(members::create))
        // The reconciliation trigger sits above the :id routes so the
        // literal path wins
        .route("/api/members/status-check", post(status_check::status_check))
        .route(
            "/api/members/:id",
            get(members::get).put(members::update).delete(members::delete),
        )
}

fn plan_routes() -> Router {
    use handlers::plans;

    Router::new()
        .route("/api/plans", get(plans::list).post(plans::create))
        .route(
            "/api/plans/:id",
            get(plans::get).put(plans::update).delete(plans::delete),
        )
}

fn batch_routes() -> Router {
    use handlers::batches;

    Router::new()
        .route("/api/batches", get(batches::list).post(batches::create))
        .route(
            "/api/batches/:id",
            get(batches::get).put(batches::update).delete(batches::delete),
        )
}

fn payment_routes() -> Router {
    use handlers::payments;

    Router::new()
        .route("/api/payments", get(payments::list).post(payments::create))
        // The member ledger sits above the :id routes so the literal
        // segment wins
        .route("/api/payments/member/:id", get(payments::member_history))
        .route(
            "/api/payments/:id",
            get(payments::get)
                .put(payments::correct)
                .delete(payments::delete),
        )
}

fn attendance_routes() -> Router {
    use handlers::attendance;

    Router::new().route(
        "/api/attendance",
        get(attendance::list).post(attendance::mark),
    )
}

fn staff_routes() -> Router {
    use handlers::staff;

    Router::new()
        .route("/api/staff", get(staff::list).post(staff::create))
        .route(
            "/api/staff/:id",
            get(staff::get).put(staff::update).delete(staff::delete),
        )
}

fn expense_routes() -> Router {
    use handlers::expenses;

    Router::new()
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/expenses/:id",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
}

fn enquiry_routes() -> Router {
    use handlers::enquiries;

    Router::new()
        .route("/api/enquiries", get(enquiries::list).post(enquiries::create))
        .route("/api/enquiries/:id/convert", post(enquiries::convert))
        .route(
            "/api/enquiries/:id",
            get(enquiries::get)
                .put(enquiries::update)
                .delete(enquiries::delete),
        )
}

fn report_routes() -> Router {
    use handlers::reports;

    Router::new()
        .route("/api/reports/expiring", get(reports::expiring))
        .route("/api/reports/financial", get(reports::financial))
        .route("/api/reports/attendance", get(reports::attendance))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Gym API",
            "version": version,
            "description": "Multi-tenant gym administration backend",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/verify-otp, /auth/login (public)",
                "members": "/api/members[/:id] (protected)",
                "status_check": "/api/members/status-check (protected, admin)",
                "plans": "/api/plans[/:id] (protected)",
                "batches": "/api/batches[/:id] (protected)",
                "payments": "/api/payments[/:id], /api/payments/member/:id (protected, admin corrections)",
                "attendance": "/api/attendance (protected)",
                "staff": "/api/staff[/:id] (protected, admin writes)",
                "expenses": "/api/expenses[/:id] (protected, admin)",
                "enquiries": "/api/enquiries[/:id] (protected)",
                "reports": "/api/reports/{expiring,financial,attendance} (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match db::Db::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
