
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use futures::{Stream, StreamExt};
use indexmap::IndexMap;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::{
    Modem, OfonoError,
    remote::{ModemEvent, PropertyMap, RemoteBus, RemoteManager},
};
use crate::services::common::{CallbackSlot, Property, types::ObjectPath};

type ModemMap = IndexMap<ObjectPath, Arc<Modem>>;

/// Lifecycle of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    /// Not started yet.
    #[default]
    Uninitialized,
    /// Modem enumeration is in flight.
    Discovering,
    /// Enumeration finished and arrivals/departures are being followed.
    Active,
}

/// Tracks the modems oFono knows about (`org.ofono.Manager`).
///
/// Modems are kept in arrival order and keyed by object path; a path is never
/// present twice. The collection stays empty until enumeration completes, and
/// `ModemAdded`/`ModemRemoved` are only followed after that. The background
/// task owns the root handle and ends when the manager drops.
pub struct OfonoManager {
    state: Property<ManagerState>,
    modems: Property<ModemMap>,
    modems_changed: CallbackSlot<Vec<Arc<Modem>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl OfonoManager {
    /// Bind the manager root object and start modem discovery.
    ///
    /// Returns as soon as the root handle exists; enumeration runs in the
    /// background. Use [`wait_active`](Self::wait_active) to wait for it.
    ///
    /// # Errors
    /// Returns an error if the manager root object cannot be bound.
    #[instrument(skip(bus))]
    pub async fn create(bus: Arc<dyn RemoteBus>) -> Result<Arc<Self>, OfonoError> {
        let remote = bus
            .manager()
            .await
            .inspect_err(|err| error!("Unable to bind oFono manager: {err}"))?;

        let manager = Arc::new(Self {
            state: Property::new(ManagerState::Uninitialized),
            modems: Property::new(ModemMap::new()),
            modems_changed: CallbackSlot::new(),
            task: Mutex::new(None),
        });

        manager.state.set(ManagerState::Discovering);
        let handle = tokio::spawn(Self::run(bus, remote, Arc::downgrade(&manager)));
        *manager
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        Ok(manager)
    }

    async fn run(bus: Arc<dyn RemoteBus>, remote: Arc<dyn RemoteManager>, manager: Weak<Self>) {
        match remote.get_modems().await {
            Ok(entries) => {
                let mut discovered = Vec::with_capacity(entries.len());
                for (path, properties) in entries {
                    match Modem::create(&*bus, &path, &properties).await {
                        Ok(modem) => discovered.push(modem),
                        Err(err) => warn!("Skipping modem {path}: {err}"),
                    }
                }

                let Some(manager) = manager.upgrade() else {
                    debug!("Manager dropped before enumeration completed");
                    return;
                };
                manager.insert_batch(discovered);
            }
            Err(err) => {
                error!("Failed to enumerate modems: {err}");
            }
        }

        let events = remote.receive_modem_events().await;

        let Some(this) = manager.upgrade() else {
            return;
        };
        this.state.set(ManagerState::Active);
        drop(this);

        let mut events = match events {
            Ok(stream) => stream,
            Err(err) => {
                error!("Failed to subscribe to modem arrivals and departures: {err}");
                return;
            }
        };

        while let Some(event) = events.next().await {
            if manager.strong_count() == 0 {
                break;
            }

            match event {
                ModemEvent::Added { path, properties } => {
                    Self::handle_modem_added(&*bus, &manager, path, properties).await;
                }
                ModemEvent::Removed { path } => {
                    let Some(manager) = manager.upgrade() else {
                        break;
                    };
                    manager.remove(&path);
                }
            }
        }

        debug!("Modem event stream ended");
    }

    async fn handle_modem_added(
        bus: &dyn RemoteBus,
        manager: &Weak<Self>,
        path: ObjectPath,
        properties: PropertyMap,
    ) {
        let known = manager
            .upgrade()
            .is_some_and(|manager| manager.modems.get().contains_key(&path));
        if known {
            debug!("Ignoring ModemAdded for known modem {path}");
            return;
        }

        let modem = match Modem::create(bus, &path, &properties).await {
            Ok(modem) => modem,
            Err(err) => {
                warn!("Skipping added modem {path}: {err}");
                return;
            }
        };

        if let Some(manager) = manager.upgrade() {
            manager.insert(modem);
        }
    }

    fn insert_batch(&self, discovered: Vec<Arc<Modem>>) {
        self.modems.modify(|modems| {
            for modem in discovered {
                let path = modem.path().to_string();
                if modems.contains_key(&path) {
                    warn!("Modem {path} enumerated twice, keeping the first entry");
                    continue;
                }
                modems.insert(path, modem);
            }
            true
        });

        info!("Discovered {} modem(s)", self.modems.get().len());
        self.notify_modems_changed();
    }

    fn insert(&self, modem: Arc<Modem>) {
        let path = modem.path().to_string();
        let inserted = self.modems.modify(|modems| {
            if modems.contains_key(&path) {
                return false;
            }
            modems.insert(path.clone(), modem);
            true
        });

        if inserted {
            info!("Modem {path} added");
            self.notify_modems_changed();
        } else {
            debug!("Ignoring ModemAdded for known modem {path}");
        }
    }

    fn remove(&self, path: &str) {
        let removed = self
            .modems
            .modify(|modems| modems.shift_remove(path).is_some());

        if removed {
            info!("Modem {path} removed");
            self.notify_modems_changed();
        } else {
            debug!("Ignoring ModemRemoved for unknown modem {path}");
        }
    }

    fn notify_modems_changed(&self) {
        self.modems_changed.notify(self.modems());
    }

    /// Snapshot of the modems in arrival order.
    pub fn modems(&self) -> Vec<Arc<Modem>> {
        self.modems.get().into_values().collect()
    }

    /// The modem at `path`, if known.
    pub fn modem(&self, path: &str) -> Option<Arc<Modem>> {
        self.modems.get().get(path).cloned()
    }

    /// Stream of modem snapshots, starting with the current one.
    pub fn watch_modems(&self) -> impl Stream<Item = Vec<Arc<Modem>>> + Send + use<> {
        self.modems
            .watch()
            .map(|modems| modems.into_values().collect())
    }

    /// Register the handler fired after the modem collection changes.
    ///
    /// Replaces any previous handler. The handler receives the new snapshot.
    pub fn set_modems_changed_callback<F>(&self, handler: F)
    where
        F: Fn(Vec<Arc<Modem>>) + Send + Sync + 'static,
    {
        self.modems_changed.set(handler);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ManagerState {
        self.state.get()
    }

    /// Wait until enumeration has finished, successfully or not.
    pub async fn wait_active(&self) {
        self.state
            .wait_for(|state| *state == ManagerState::Active)
            .await;
    }
}

impl Drop for OfonoManager {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.abort();
        }
    }
}

impl fmt::Debug for OfonoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfonoManager")
            .field("state", &self.state.get())
            .field("modems", &self.modems.get().keys().collect::<Vec<_>>())
            .finish()
    }
}
