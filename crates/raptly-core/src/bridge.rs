// ── Bridge lifecycle ──
//
// The per-instance context tying one RAPT account to its three family
// coordinators. Construction is offline; `start()` performs the first
// synchronous refresh of every family (startup fails loudly if the
// account is unreachable) and then spawns one poll task per coordinator.
// `shutdown()` is the explicit unload path: cancel, join, done.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use raptly_api::{ApiEndpoints, TokenManager, TransportConfig};

use crate::config::BridgeConfig;
use crate::coordinator::{Coordinator, FamilyClient};
use crate::error::CoreError;
use crate::families::{
    BrewZillaCoordinator, HydrometerCoordinator, TemperatureControllerCoordinator,
};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<BridgeInner>`. Owns the token manager and
/// the three coordinators for the lifetime of the configured account;
/// torn down explicitly via [`shutdown()`](Self::shutdown).
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    token_manager: Arc<TokenManager>,
    brewzillas: Arc<BrewZillaCoordinator>,
    hydrometers: Arc<HydrometerCoordinator>,
    temperature_controllers: Arc<TemperatureControllerCoordinator>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Bridge {
    /// Create a bridge from configuration. Does NOT touch the network --
    /// call [`start()`](Self::start) to refresh and begin polling.
    pub fn new(config: BridgeConfig) -> Result<Self, CoreError> {
        let endpoints = ApiEndpoints::select(config.use_dev_api);
        Self::with_endpoints(config, endpoints)
    }

    /// Like [`new()`](Self::new) with an explicit endpoint pair. Used by
    /// tests pointing at a mock server.
    pub fn with_endpoints(config: BridgeConfig, endpoints: ApiEndpoints) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.request_timeout,
        };
        let http = transport.build_client()?;

        let token_manager = Arc::new(TokenManager::new(
            http.clone(),
            endpoints.token().clone(),
            config.email.clone(),
            config.api_secret.clone(),
        ));

        Ok(Self {
            inner: Arc::new(BridgeInner {
                brewzillas: Arc::new(Coordinator::new(
                    Arc::clone(&token_manager),
                    http.clone(),
                    endpoints.clone(),
                )),
                hydrometers: Arc::new(Coordinator::new(
                    Arc::clone(&token_manager),
                    http.clone(),
                    endpoints.clone(),
                )),
                temperature_controllers: Arc::new(Coordinator::new(
                    Arc::clone(&token_manager),
                    http,
                    endpoints,
                )),
                token_manager,
                config,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.inner.token_manager
    }

    pub fn brewzillas(&self) -> &Arc<BrewZillaCoordinator> {
        &self.inner.brewzillas
    }

    pub fn hydrometers(&self) -> &Arc<HydrometerCoordinator> {
        &self.inner.hydrometers
    }

    pub fn temperature_controllers(&self) -> &Arc<TemperatureControllerCoordinator> {
        &self.inner.temperature_controllers
    }

    /// Refresh every family once, propagating the first failure.
    ///
    /// One-shot consumers use this directly instead of
    /// [`start()`](Self::start); no background tasks are involved.
    pub async fn refresh_all(&self) -> Result<(), CoreError> {
        self.inner.brewzillas.refresh().await?;
        self.inner.hydrometers.refresh().await?;
        self.inner.temperature_controllers.refresh().await?;
        Ok(())
    }

    /// Start the bridge: first refresh of every family (a failure aborts
    /// startup), then one poll task per coordinator.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.refresh_all().await?;

        let interval = self.inner.config.poll_interval;
        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(poll_task(
            Arc::clone(&self.inner.brewzillas),
            interval,
            self.inner.cancel.clone(),
        )));
        handles.push(tokio::spawn(poll_task(
            Arc::clone(&self.inner.hydrometers),
            interval,
            self.inner.cancel.clone(),
        )));
        handles.push(tokio::spawn(poll_task(
            Arc::clone(&self.inner.temperature_controllers),
            interval,
            self.inner.cancel.clone(),
        )));

        info!(interval_secs = interval.as_secs(), "bridge started");
        Ok(())
    }

    /// Stop polling and join the background tasks.
    ///
    /// Coordinators stay readable afterwards, but no further refreshes
    /// run. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("bridge stopped");
    }
}

/// Periodically refresh one coordinator until cancelled.
///
/// Each tick is awaited to completion before the next is considered, so
/// refreshes for one family never overlap.
async fn poll_task<A: FamilyClient>(
    coordinator: Arc<Coordinator<A>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    // A slow refresh delays the next tick instead of bursting to catch up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(err) = coordinator.refresh().await {
                    warn!(family = A::FAMILY, error = %err, "periodic refresh failed");
                }
            }
        }
    }
}
