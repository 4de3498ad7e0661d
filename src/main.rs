mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::router::{build_router, AppServices};
use crate::core::{database, middleware};
use crate::features::auth::services::AuthService;
use crate::features::auth::JwtService;
use crate::features::categories::services::CategoryService;
use crate::features::ideas::events::IdeaEventBus;
use crate::features::ideas::services::IdeaService;
use crate::features::notifications::services::NotificationJobService;
use crate::features::notifications::workers::{NotifySettings, NotifyVotersWorker};
use crate::features::statuses::services::StatusService;
use crate::features::votes::services::VoteService;
use crate::modules::mail;
use crate::modules::persistence::postgres::{
    PgCategoryRepository, PgIdeaRepository, PgNotificationJobRepository, PgStatusRepository,
    PgUserRepository, PgVoteRepository,
};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Repositories
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let category_repo = Arc::new(PgCategoryRepository::new(pool.clone()));
    let status_repo = Arc::new(PgStatusRepository::new(pool.clone()));
    let idea_repo = Arc::new(PgIdeaRepository::new(pool.clone()));
    let vote_repo = Arc::new(PgVoteRepository::new(pool.clone()));
    let job_repo = Arc::new(PgNotificationJobRepository::new(pool.clone()));

    // Initialize auth
    let jwt = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl,
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        Arc::clone(&jwt),
        config.auth.admin_emails.clone(),
    ));
    tracing::info!(
        "Auth service initialized ({} bootstrap admin emails)",
        config.auth.admin_emails.len()
    );

    // Initialize domain services
    let events = IdeaEventBus::new();
    let category_service = Arc::new(CategoryService::new(category_repo));
    let status_service = Arc::new(StatusService::new(status_repo));
    let vote_service = Arc::new(VoteService::new(vote_repo));
    let notification_job_service = Arc::new(NotificationJobService::new(job_repo));
    let idea_service = Arc::new(IdeaService::new(
        idea_repo,
        user_repo,
        Arc::clone(&category_service),
        Arc::clone(&status_service),
        Arc::clone(&vote_service),
        Arc::clone(&notification_job_service),
        events,
    ));
    tracing::info!("Idea, vote, status and category services initialized");

    // Start voter notification worker in background
    let mailer = mail::build_mailer(&config.notification)
        .map_err(|e| anyhow::anyhow!("Mailer setup failed: {}", e))?;
    let notify_worker = NotifyVotersWorker::new(
        Arc::clone(&notification_job_service),
        mailer,
        NotifySettings::new(&config.app, &config.notification),
    );
    tokio::spawn(async move {
        notify_worker.run().await;
    });
    tracing::info!(
        "Notification worker started (mailer: {:?})",
        config.notification.mailer
    );

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let services = AppServices {
        auth: auth_service,
        categories: category_service,
        statuses: status_service,
        ideas: idea_service,
        votes: vote_service,
    };

    let app = Router::new()
        .merge(swagger)
        .merge(build_router(&services, jwt))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
