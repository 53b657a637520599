#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = gym_api::config::config();
    tracing::info!("Starting Gym API in {:?} mode", config.environment);

    // Daily membership sweeps run alongside the HTTP server
    tokio::spawn(gym_api::scheduler::run());

    let app = gym_api::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("GYM_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🏋️ Gym API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
