use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use sqlx::postgres::PgPoolOptions;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use gophermart::accrual::RateLimitGate;
use gophermart::auth::TokenSigner;
use gophermart::config::AppConfig;
use gophermart::worker::WorkerPool;
use gophermart::{AppState, routes};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::register,
        routes::auth::login,
        routes::orders::submit_order,
        routes::orders::list_orders,
        routes::balance::balance,
        routes::balance::withdraw,
        routes::balance::withdrawals,
    ),
    components(schemas(
        gophermart::models::auth::Credentials,
        gophermart::models::order::OrderResponse,
        gophermart::models::order::BalanceResponse,
        gophermart::models::withdrawal::WithdrawRequest,
        gophermart::models::withdrawal::WithdrawalResponse,
    )),
)]
struct ApiDocs;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let config = AppConfig::load();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_uri)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    let token_signer = TokenSigner::new(config.token_secret.clone());
    let rate_limit_gate = Arc::new(RateLimitGate::new());
    let http_client = reqwest::Client::new();

    let (worker_pool, worker_handle) = WorkerPool::spawn(
        pool.clone(),
        http_client,
        rate_limit_gate.clone(),
        config.accrual_system_address.clone(),
        config.worker_count,
    );

    let state = web::Data::new(AppState {
        pool,
        token_signer: token_signer.clone(),
        accrual_base_url: config.accrual_system_address.clone(),
        rate_limit_gate,
        worker: worker_handle,
    });

    let listen_address = config.listen_address();

    let http_server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(["GET", "POST"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(web::Data::new(token_signer.clone()))
            .wrap(middleware::Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .wrap(middleware::Compress::default())
            .wrap(cors)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDocs::openapi()),
            )
            .configure(routes::config)
            .default_service(web::route().to(routes::not_found::not_found))
    })
    .bind(&listen_address)?
    .run();

    let server_handle = http_server.handle();
    let server_task = tokio::spawn(http_server);

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, draining in-flight requests and workers");

    server_handle.stop(true).await;
    worker_pool.shutdown().await;
    server_task.await??;

    Ok(())
}
