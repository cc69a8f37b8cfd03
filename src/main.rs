use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use admatch::{
    application::{
        ads::AdService,
        allow_list::AllowListRegistry,
        error::AppError,
        repos::{AdsRepo, AdsWriteRepo, CodesRepo, HealthRepo},
        retrieval::CacheAsideRetriever,
        validation::ConditionValidator,
    },
    cache::{Cache, CacheBackend, CacheConfig, MemoryCache, RedisCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use sqlx::PgPool;
use tokio::{net::TcpListener, sync::Notify};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let codes_repo: Arc<dyn CodesRepo> = repositories.clone();
    let allow_list = Arc::new(AllowListRegistry::load(codes_repo.as_ref()).await?);

    let cache_config = CacheConfig::from(&settings);
    let cache = init_cache(&cache_config).await?;

    let ads_repo: Arc<dyn AdsRepo> = repositories.clone();
    let ads_write_repo: Arc<dyn AdsWriteRepo> = repositories.clone();
    let health_repo: Arc<dyn HealthRepo> = repositories.clone();

    let retriever = CacheAsideRetriever::new(cache, ads_repo, &cache_config);
    let service = AdService::new(
        ads_write_repo,
        ConditionValidator::new(allow_list),
        retriever,
    );

    let state = ApiState {
        ads: Arc::new(service),
        health: health_repo,
    };

    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_and_migrate(&settings).await?;
    pool.close().await;

    info!(target = "admatch::migrate", "Migrations applied");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = connect_and_migrate(settings).await?;
    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn connect_and_migrate(settings: &config::Settings) -> Result<PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(
        database_url,
        settings.database.max_connections.get(),
        settings.database.acquire_timeout,
    )
    .await
    .map_err(|err| AppError::from(InfraError::Database(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(pool)
}

async fn init_cache(config: &CacheConfig) -> Result<Arc<dyn Cache>, AppError> {
    match config.backend {
        CacheBackend::Memory => {
            info!(
                target = "admatch::startup",
                capacity = config.memory_capacity,
                ttl_secs = config.ttl.as_secs(),
                "Using in-process cache"
            );
            Ok(Arc::new(MemoryCache::new(config.memory_capacity_non_zero())))
        }
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                AppError::from(InfraError::configuration("cache.redis_url is not configured"))
            })?;
            let cache = RedisCache::connect(url).await?;
            cache.ping().await?;
            info!(
                target = "admatch::startup",
                ttl_secs = config.ttl.as_secs(),
                "Using Redis cache"
            );
            Ok(Arc::new(cache))
        }
    }
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "admatch::startup",
        addr = %settings.server.addr,
        "Listening"
    );

    let shutdown_started = Arc::new(Notify::new());
    let signal_notify = shutdown_started.clone();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            info!(target = "admatch::shutdown", "Shutdown requested, draining connections");
            signal_notify.notify_one();
        },
    );

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = server.into_future() => {
            result.map_err(|err| AppError::from(InfraError::Server(err.to_string())))?;
        }
        _ = drain_deadline(shutdown_started, grace) => {
            warn!(
                target = "admatch::shutdown",
                grace_secs = grace.as_secs(),
                "Graceful shutdown timed out"
            );
        }
    }

    Ok(())
}

async fn drain_deadline(started: Arc<Notify>, grace: Duration) {
    started.notified().await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "admatch::shutdown", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "admatch::shutdown", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
