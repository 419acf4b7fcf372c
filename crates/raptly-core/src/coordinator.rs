// ── Generic poll coordinator ──
//
// One coordinator per device family. Each refresh cycle fetches the
// current token, lazily (re)builds the family's API client when the
// token value changed, lists devices, and replaces the keyed snapshot
// wholesale. Failures leave the previous snapshot in place -- consumers
// keep rendering the last-known-good data.
//
// The snapshot is broadcast through a `watch` channel: entities hold a
// receiver and re-render on replacement. Confirmed control writes are
// applied back through `commit_write`, so the coordinator stays the
// snapshot's only writer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, watch};
use tracing::{debug, trace};

use raptly_api::{ApiEndpoints, Error as ApiError, TokenManager};

use crate::error::CoreError;

/// One device's attributes, as the cloud reports them. Open-ended:
/// families disagree on fields and firmware revisions add new ones.
pub type DeviceRecord = Map<String, Value>;

/// Device identifier -> latest known record, for one family.
pub type Snapshot = HashMap<String, DeviceRecord>;

/// A family-specific API client usable by the generic coordinator.
///
/// The `build` constructor is the client factory: coordinators never
/// mutate a client's token in place, they construct a replacement.
pub trait FamilyClient: Send + Sync + Sized + 'static {
    /// Family name used in logs and error messages.
    const FAMILY: &'static str;

    /// Human-facing family label used in device display names.
    const LABEL: &'static str;

    /// Construct a client bound to the given token.
    fn build(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self;

    /// The token this client was constructed with.
    fn token(&self) -> &str;

    /// Call the family's list endpoint.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Value>, ApiError>> + Send;
}

/// Outcome of the most recent refresh cycle.
///
/// Kept separate from the snapshot so a failed refresh (snapshot
/// retained) is distinguishable from a successful refresh that returned
/// no devices (snapshot empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    /// No refresh attempted yet.
    Never,
    /// Last refresh succeeded.
    Ok { at: DateTime<Utc> },
    /// Last refresh failed; the previous snapshot is still served.
    Failed { message: String, at: DateTime<Utc> },
}

impl RefreshStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Polling engine owning one family's snapshot and API client slot.
pub struct Coordinator<A: FamilyClient> {
    token_manager: Arc<TokenManager>,
    http: reqwest::Client,
    endpoints: ApiEndpoints,
    api: Mutex<Option<Arc<A>>>,
    snapshot: watch::Sender<Arc<Snapshot>>,
    status: watch::Sender<RefreshStatus>,
}

impl<A: FamilyClient> Coordinator<A> {
    pub fn new(
        token_manager: Arc<TokenManager>,
        http: reqwest::Client,
        endpoints: ApiEndpoints,
    ) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::new()));
        let (status, _) = watch::channel(RefreshStatus::Never);

        Self {
            token_manager,
            http,
            endpoints,
            api: Mutex::new(None),
            snapshot,
            status,
        }
    }

    pub fn family(&self) -> &'static str {
        A::FAMILY
    }

    /// Human-facing family label, used in device display names.
    pub fn label(&self) -> &'static str {
        A::LABEL
    }

    /// Current snapshot (cheap `Arc` clone). After a failed refresh this
    /// still serves the last successful result.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot.subscribe()
    }

    pub fn status(&self) -> RefreshStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RefreshStatus> {
        self.status.subscribe()
    }

    /// The live API client handle, for entity writes that bypass the
    /// refresh cycle. Available after the first refresh.
    pub async fn api(&self) -> Result<Arc<A>, CoreError> {
        self.api
            .lock()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(CoreError::NotReady { family: A::FAMILY })
    }

    /// Run one refresh cycle: token, client, list, re-key, replace.
    ///
    /// Any failure before the replace is wrapped as
    /// [`CoreError::UpdateFailed`] and leaves the snapshot untouched.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        match self.try_refresh().await {
            Ok(count) => {
                debug!(family = A::FAMILY, devices = count, "refresh complete");
                self.status.send_replace(RefreshStatus::Ok { at: Utc::now() });
                Ok(())
            }
            Err(source) => {
                let failed = CoreError::UpdateFailed {
                    family: A::FAMILY,
                    source,
                };
                self.status.send_replace(RefreshStatus::Failed {
                    message: failed.to_string(),
                    at: Utc::now(),
                });
                Err(failed)
            }
        }
    }

    async fn try_refresh(&self) -> Result<usize, ApiError> {
        let api = self.current_api().await?;
        let devices = api.list_devices().await?;

        let snapshot = key_by_id(devices);
        let count = snapshot.len();
        self.snapshot.send_replace(Arc::new(snapshot));
        Ok(count)
    }

    /// Token fetch plus lazy client replacement.
    ///
    /// The rebuild trigger is a token *value* comparison: a client whose
    /// captured token no longer matches the cached one is discarded and
    /// a fresh client constructed. Clients are never mutated in place.
    async fn current_api(&self) -> Result<Arc<A>, ApiError> {
        let token = self.token_manager.get_token().await?;

        let mut guard = self.api.lock().await;
        if let Some(api) = guard.as_ref() {
            if api.token() == token {
                return Ok(Arc::clone(api));
            }
            debug!(family = A::FAMILY, "token rotated, rebuilding API client");
        }

        let api = Arc::new(A::build(self.http.clone(), &self.endpoints, token));
        *guard = Some(Arc::clone(&api));
        Ok(api)
    }

    /// Apply a confirmed control write to the cached snapshot.
    ///
    /// The coordinator is the snapshot's sole writer: entities report
    /// the applied value here instead of mutating shared state. Returns
    /// `false` (and notifies nobody) if the device is no longer in the
    /// snapshot.
    pub fn commit_write(&self, device_id: &str, attribute: &str, value: Value) -> bool {
        self.snapshot.send_if_modified(|snapshot| {
            if !snapshot.contains_key(device_id) {
                trace!(family = A::FAMILY, device_id, "write for unknown device dropped");
                return false;
            }
            let mut next = (**snapshot).clone();
            if let Some(record) = next.get_mut(device_id) {
                record.insert(attribute.to_owned(), value);
            }
            *snapshot = Arc::new(next);
            true
        })
    }
}

/// Key raw device records by their `id` field.
///
/// Records without an identifier (or that aren't objects at all) are
/// dropped rather than aborting the whole refresh.
fn key_by_id(devices: Vec<Value>) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for device in devices {
        let Value::Object(record) = device else {
            trace!("non-object device record dropped");
            continue;
        };
        let Some(id) = device_id(&record) else {
            trace!("device record without id dropped");
            continue;
        };
        snapshot.insert(id, record);
    }
    snapshot
}

/// Device identifiers arrive as strings or integers; both become string
/// keys so lookups stay uniform.
fn device_id(record: &DeviceRecord) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
