//! Server Implementation
//!
//! HTTP server startup and background task wiring.

use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::api;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, ServerState};
use crate::engine::BookingLifecycle;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests, embedding)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let mut tasks = BackgroundTasks::new();
        spawn_expiry_sweep(&state, &mut tasks);

        let app = api::router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Encore booking server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}

/// Periodic sweep flipping expired PENDING holds to CANCELLED.
///
/// The conflict checker already ignores expired holds at read time; the
/// sweep keeps the stored rows converging to the same picture.
fn spawn_expiry_sweep(state: &ServerState, tasks: &mut BackgroundTasks) {
    let lifecycle = BookingLifecycle::from_state(state);
    let interval_secs = state.config.expiry_sweep_interval_secs;
    let token = tasks.shutdown_token();

    tasks.spawn("expiry_sweep", TaskKind::Periodic, async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    match lifecycle.sweep_expired().await {
                        Ok(0) => {}
                        Ok(released) => {
                            tracing::info!(released, "Released expired pending bookings");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Expiry sweep failed");
                        }
                    }
                }
            }
        }
    });
}
