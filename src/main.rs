mod server;

use std::{future::IntoFuture, process::ExitCode};

use crate::server::{
    config::Config,
    error::{config::ConfigError, AppError, ErrorChain},
    fault::{self, TaskSupervisor},
    feature::FeatureRouters,
    router, startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    startup::init_logging();
    fault::install_panic_hook();

    match run(Config::from_env, |_| FeatureRouters::default()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::ConfigErr(err)) => {
            tracing::error!("{}", config_failure_message(&err));
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %ErrorChain(&err), "Fatal error, shutting down");
            ExitCode::FAILURE
        }
    }
}

/// Log line for a configuration error that stopped startup.
fn config_failure_message(err: &ConfigError) -> String {
    match err {
        ConfigError::MissingEnvVar(_) => format!(
            "Error: config environment variables not set. Please create/edit .env configuration file. {}",
            err
        ),
        _ => format!("Error: invalid configuration. {}", err),
    }
}

/// Starts the server and runs it until shutdown or a fatal failure.
///
/// # Arguments
/// - `load_config` - Loads the configuration; runs before anything touches the network
/// - `features` - Builds the feature routers from the shared state
///
/// # Returns
/// - `Ok(())` - Graceful shutdown
/// - `Err(AppError)` - Startup failed, or a supervised background task failed
async fn run<L, F>(load_config: L, features: F) -> Result<(), AppError>
where
    L: FnOnce() -> Result<Config, AppError>,
    F: FnOnce(&AppState) -> FeatureRouters,
{
    let config = load_config()?;

    let db = startup::connect_to_database(&config).await?;
    let (session_layer, session_store) = startup::connect_to_session(&db, &config).await?;

    let (supervisor, mut failures) = TaskSupervisor::new();
    startup::spawn_expired_session_sweep(&supervisor, session_store, db.clone(), &config);

    let state = AppState::new(db, config, supervisor);
    let app = router::router(state.clone(), features(&state), session_layer);

    let listener = startup::bind_listener(&state.config).await?;
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::select! {
        result = server => {
            result?;
            tracing::info!("Server stopped");
            Ok(())
        }
        failure = failures.wait_for_failure() => Err(AppError::InternalError(format!(
            "Background task '{}' failed: {}",
            failure.task, failure.reason
        ))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
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
                tracing::error!("Failed to listen for SIGTERM: {}", err);
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

    tracing::info!("Shutdown signal received");
}
