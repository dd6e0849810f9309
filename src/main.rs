// restaurant list: json crud api plus a listing page

mod config;
mod error;
mod pages;
mod routes;
mod sql;
mod types;

use tokio::{net::TcpListener, signal};
use tower_http::{
	cors::CorsLayer,
	trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;
use routes::ServerState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// a missing .env is fine, the defaults cover it
	dotenvy::dotenv().ok();
	let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
	fmt().with_env_filter(log_filter(rust_log.as_deref())).init();

	let config = Config::load()?;

	info!("Connecting to {}", config.database_url);
	let db = sql::open(&config.database_url, config.max_connections).await?;
	sql::migrate(&db).await?;

	let app = routes::app(ServerState { db })
		.layer(CorsLayer::permissive())
		.layer(
			TraceLayer::new_for_http()
				.make_span_with(DefaultMakeSpan::new().level(Level::INFO))
				.on_response(DefaultOnResponse::new().level(Level::INFO)),
		);

	let address = format!("0.0.0.0:{}", config.port);
	let listener = TcpListener::bind(&address).await?;
	info!("Server running on {address}");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	info!("Server shut down");
	Ok(())
}

// unset or unparsable RUST_LOG falls back to info
fn log_filter(directives: Option<&str>) -> EnvFilter {
	directives
		.and_then(|d| EnvFilter::try_new(d).ok())
		.unwrap_or_else(|| EnvFilter::new("info"))
}

async fn shutdown_signal() {
	let ctrl_c = async {
		match signal::ctrl_c().await {
			Ok(()) => info!("Received Ctrl+C, shutting down"),
			Err(_) => std::future::pending::<()>().await,
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut term) => {
				term.recv().await;
				info!("Received terminate signal, shutting down");
			},
			Err(_) => std::future::pending::<()>().await,
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing_subscriber::filter::LevelFilter;

	#[test]
	fn logs_at_info_without_rust_log() {
		assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
	}

	#[test]
	fn rust_log_overrides_the_level() {
		assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
		assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
	}
}
