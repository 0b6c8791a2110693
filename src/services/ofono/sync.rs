//! Generic property synchronization for oFono objects.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use super::{
    OfonoError,
    remote::{PropertyValue, RemoteObject},
};
use crate::services::common::Property;

/// Parses `value` and stores it on the owner.
pub type PropertyApplier<T> = fn(&T, &PropertyValue) -> Result<(), OfonoError>;

/// Static table mapping oFono property names to their appliers.
///
/// Names are matched exactly and case-sensitively. Names without an entry
/// are ignored.
pub struct PropertyTable<T: 'static> {
    entries: &'static [(&'static str, PropertyApplier<T>)],
}

impl<T: 'static> PropertyTable<T> {
    /// Wrap a static list of `(name, applier)` pairs.
    pub const fn new(entries: &'static [(&'static str, PropertyApplier<T>)]) -> Self {
        Self { entries }
    }

    /// Find the applier for `name`.
    pub fn lookup(&self, name: &str) -> Option<PropertyApplier<T>> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, applier)| *applier)
    }

    /// Property names this table understands.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Apply one `(name, value)` pair to `owner`.
    ///
    /// Unknown names are skipped; values of the wrong type are logged and
    /// dropped. Returns whether a field was updated.
    pub fn apply(&self, owner: &T, path: &str, name: &str, value: &PropertyValue) -> bool {
        let Some(applier) = self.lookup(name) else {
            trace!(path, name, "ignoring unknown property");
            return false;
        };

        debug!(path, name, %value, "property changed");

        match applier(owner, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(path, name, "dropping property update: {err}");
                false
            }
        }
    }
}

/// Progress of the initial bulk fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// The bulk fetch has not completed yet.
    #[default]
    Pending,
    /// The bulk fetch completed and its values were applied.
    Synced,
    /// The bulk fetch failed; fields keep their sentinels until notified.
    Failed(String),
}

/// Keeps one owner in sync with one remote object.
///
/// Issues the bulk fetch, applies it, and only then subscribes to
/// `PropertyChanged`. The owner is held weakly; completions that arrive
/// after the owner is gone are discarded. Dropping the synchronizer ends
/// the subscription.
pub struct PropertySynchronizer {
    remote: Arc<dyn RemoteObject>,
    state: Property<SyncState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PropertySynchronizer {
    /// Bind a synchronizer to `remote`. Nothing happens until [`start`](Self::start).
    pub fn new(remote: Arc<dyn RemoteObject>) -> Self {
        Self {
            remote,
            state: Property::new(SyncState::Pending),
            task: Mutex::new(None),
        }
    }

    /// Start synchronizing `owner` through `table`.
    ///
    /// Issues the bulk fetch right away. Calling this a second time has no
    /// effect. Must be called from within a tokio runtime.
    pub fn start<T>(&self, table: &'static PropertyTable<T>, owner: Weak<T>)
    where
        T: Send + Sync + 'static,
    {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.is_some() {
            warn!(path = self.remote.path(), "synchronization already started");
            return;
        }

        *task = Some(tokio::spawn(Self::run(
            Arc::clone(&self.remote),
            table,
            owner,
            self.state.clone(),
        )));
    }

    async fn run<T>(
        remote: Arc<dyn RemoteObject>,
        table: &'static PropertyTable<T>,
        owner: Weak<T>,
        state: Property<SyncState>,
    ) where
        T: Send + Sync + 'static,
    {
        let path = remote.path().to_string();

        match remote.get_properties().await {
            Ok(properties) => {
                let Some(owner) = owner.upgrade() else {
                    debug!(%path, "owner dropped before initial properties arrived");
                    return;
                };

                for (name, value) in &properties {
                    table.apply(&owner, &path, name, value);
                }
                state.set(SyncState::Synced);
            }
            Err(err) => {
                error!(%path, "failed to fetch initial properties: {err}");
                state.set(SyncState::Failed(err.to_string()));
            }
        }

        let mut changes = match remote.receive_property_changed().await {
            Ok(stream) => stream,
            Err(err) => {
                error!(%path, "failed to subscribe to property changes: {err}");
                return;
            }
        };

        while let Some((name, value)) = changes.next().await {
            let Some(owner) = owner.upgrade() else {
                debug!(%path, "owner dropped, stopping property monitoring");
                return;
            };

            table.apply(&owner, &path, &name, &value);
        }

        debug!(%path, "property change stream ended");
    }

    /// Object path of the synchronized remote object.
    pub fn path(&self) -> &str {
        self.remote.path()
    }

    /// Current progress of the initial fetch.
    pub fn state(&self) -> SyncState {
        self.state.get()
    }

    /// Wait until the initial fetch has either completed or failed.
    pub async fn wait_synced(&self) -> SyncState {
        self.state
            .wait_for(|state| *state != SyncState::Pending)
            .await
    }

    /// Ask the remote side to change a property.
    ///
    /// The result goes to the caller only. The cached value changes when the
    /// remote side confirms with a `PropertyChanged` notification.
    ///
    /// # Errors
    /// Returns the bus error if the remote side rejects or fails the write.
    pub async fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), OfonoError> {
        self.remote.set_property(name, value).await.map_err(|err| {
            error!(path = self.remote.path(), name, "failed to set property: {err}");
            err
        })
    }
}

impl Drop for PropertySynchronizer {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for PropertySynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySynchronizer")
            .field("path", &self.remote.path())
            .field("state", &self.state.get())
            .finish()
    }
}
