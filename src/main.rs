//! Room service binary.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use room_service::adapters::websocket::{room_router, RoomServiceState};
use room_service::adapters::{InMemoryCommandCache, InMemoryRoomStore, RedisCommandCache};
use room_service::application::{CommandDispatcher, RetryStrategy};
use room_service::config::{AppConfig, DispatchConfig, LogFormat, RedisConfig, ServerConfig};
use room_service::ports::{CommandCache, RoomStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let store: Arc<dyn RoomStore> = Arc::new(InMemoryRoomStore::new());
    let cache = command_cache(&config.dispatch, config.redis.as_ref()).await?;

    let dispatcher = CommandDispatcher::new(store, cache, RetryStrategy::from(&config.retry))
        .with_max_in_flight(config.dispatch.max_in_flight);
    let app = room_router(RoomServiceState::new(dispatcher));

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Room service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Room service stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = server
        .log_filter()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn command_cache(
    dispatch: &DispatchConfig,
    redis: Option<&RedisConfig>,
) -> Result<Arc<dyn CommandCache>, Box<dyn Error>> {
    let ttl = dispatch.command_ttl();
    let Some(redis) = redis else {
        tracing::info!("No Redis configured, deduplicating commands in memory");
        return Ok(Arc::new(InMemoryCommandCache::new(ttl)));
    };

    let connect = RedisCommandCache::connect(&redis.url, dispatch.command_key_prefix.clone(), ttl);
    let cache = tokio::time::timeout(redis.connect_timeout(), connect)
        .await
        .map_err(|_| "timed out connecting to Redis")??;
    tracing::info!("Deduplicating commands in Redis");
    Ok(Arc::new(cache))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
