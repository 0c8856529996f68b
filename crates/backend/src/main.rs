pub mod domain;
pub mod handlers;
pub mod projections;
pub mod shared;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Log directory next to the build artifacts
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, quiet the SQL layers
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Request logging middleware
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = next.run(req).await;

        tracing::info!(
            target: "http",
            "{} {} -> {} in {}ms",
            method,
            path,
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
        response
    }

    // Load config.toml and bring the database up
    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(Some(&db_path.to_string_lossy()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // Sales order intake
        .route(
            "/api/sales-order",
            get(handlers::a001_sales_order::list_all).post(handlers::a001_sales_order::upsert),
        )
        .route(
            "/api/sales-order/testdata",
            post(handlers::a001_sales_order::insert_test_data),
        )
        .route(
            "/api/sales-order/:id",
            get(handlers::a001_sales_order::get_by_id).delete(handlers::a001_sales_order::delete),
        )
        // P900 Production schedule (date-bucketed pages)
        .route(
            "/api/p900/production-schedule",
            get(handlers::p900_production_schedule::list),
        )
        // P901 Plant service orders (date-bucketed pages)
        .route(
            "/api/p901/service-orders",
            get(handlers::p901_plant_service_orders::list),
        )
        // P902 Backorders (row-paged)
        .route(
            "/api/p902/backorders",
            get(handlers::p902_backorders::list),
        )
        // Printable reports and their spreadsheet exports
        .route(
            "/api/reports/production-schedule",
            get(handlers::reports::production_schedule),
        )
        .route(
            "/api/reports/production-schedule/export",
            get(handlers::reports::production_schedule_export),
        )
        .route(
            "/api/reports/service-orders",
            get(handlers::reports::service_orders),
        )
        .route(
            "/api/reports/service-orders/export",
            get(handlers::reports::service_orders_export),
        )
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            // Propagate the error to stop the application
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
