use axum::{routing::{get, post}, Router};
use cart_matcher::api::{self, AppState};
use cart_matcher::service::Normalizer;
use cart_matcher::{AppConfig, Selector};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let state = AppState {
        normalizer: Normalizer::new(config.matching.max_query_words),
        selector: Arc::new(Selector::new(config.matching)),
    };

    // 构建路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/normalize", post(api::normalize_lines))
        .route("/api/match/batch", post(api::batch_match))
        .with_state(state)
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/normalize     - list lines -> normalized requests");
    info!("  POST /api/match/batch   - requests + candidates -> decisions");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
