//! In-memory bus used by the test-suite.
//!
//! Every remote object keeps a scripted property set, records the order of
//! bulk fetches and subscriptions, and lets a test hold back a bulk fetch or
//! push notifications. Notifications emitted while nobody is subscribed are
//! dropped, like signals on a real bus.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::{
    Interface, ModemEvent, ModemEventStream, PropertyChangeStream, PropertyMap, PropertyValue,
    RemoteBus, RemoteManager, RemoteObject,
};
use crate::services::ofono::OfonoError;

/// What happened on a mock remote, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Fetch,
    Subscribe,
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    fetch_gate: Option<oneshot::Receiver<()>>,
    fetch_error: Option<String>,
    set_error: Option<String>,
}

impl Script {
    fn take_gate(&mut self) -> Option<oneshot::Receiver<()>> {
        self.fetch_gate.take()
    }

    fn hold(&mut self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.fetch_gate = Some(rx);
        tx
    }
}

async fn pass_gate(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

pub(crate) struct MockObject {
    path: String,
    properties: Mutex<PropertyMap>,
    script: Mutex<Script>,
    writes: Mutex<Vec<(String, PropertyValue)>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<(String, PropertyValue)>>>,
}

impl MockObject {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            properties: Mutex::new(PropertyMap::new()),
            script: Mutex::new(Script::default()),
            writes: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_property(&self, name: &str, value: impl Into<PropertyValue>) -> &Self {
        self.properties
            .lock()
            .unwrap()
            .insert(name.to_string(), value.into());
        self
    }

    /// Hold the next bulk fetch until the returned sender fires or drops.
    pub(crate) fn hold_fetch(&self) -> oneshot::Sender<()> {
        self.script.lock().unwrap().hold()
    }

    pub(crate) fn fail_fetch(&self, reason: &str) {
        self.script.lock().unwrap().fetch_error = Some(reason.to_string());
    }

    pub(crate) fn clear_fetch_failure(&self) {
        self.script.lock().unwrap().fetch_error = None;
    }

    pub(crate) fn fail_writes(&self, reason: &str) {
        self.script.lock().unwrap().set_error = Some(reason.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub(crate) fn is_subscribed(&self) -> bool {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .any(|tx| !tx.is_closed())
    }

    pub(crate) fn writes(&self) -> Vec<(String, PropertyValue)> {
        self.writes.lock().unwrap().clone()
    }

    /// Push a `PropertyChanged` notification. Returns how many subscribers got it.
    pub(crate) fn emit(&self, name: &str, value: impl Into<PropertyValue>) -> usize {
        let value = value.into();
        self.properties
            .lock()
            .unwrap()
            .insert(name.to_string(), value.clone());

        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers
            .iter()
            .filter(|tx| tx.send((name.to_string(), value.clone())).is_ok())
            .count()
    }
}

#[async_trait]
impl RemoteObject for MockObject {
    fn path(&self) -> &str {
        &self.path
    }

    async fn get_properties(&self) -> Result<PropertyMap, OfonoError> {
        let gate = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call::Fetch);
            script.take_gate()
        };
        pass_gate(gate).await;

        if let Some(reason) = self.script.lock().unwrap().fetch_error.clone() {
            return Err(OfonoError::OperationFailed {
                operation: "GetProperties",
                reason,
            });
        }

        Ok(self.properties.lock().unwrap().clone())
    }

    async fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), OfonoError> {
        if let Some(reason) = self.script.lock().unwrap().set_error.clone() {
            return Err(OfonoError::OperationFailed {
                operation: "SetProperty",
                reason,
            });
        }

        self.writes
            .lock()
            .unwrap()
            .push((name.to_string(), value));
        Ok(())
    }

    async fn receive_property_changed(&self) -> Result<PropertyChangeStream, OfonoError> {
        self.script.lock().unwrap().calls.push(Call::Subscribe);

        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}

pub(crate) struct MockManager {
    modems: Mutex<Vec<(String, PropertyMap)>>,
    script: Mutex<Script>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ModemEvent>>>,
}

impl MockManager {
    fn new() -> Self {
        Self {
            modems: Mutex::new(Vec::new()),
            script: Mutex::new(Script::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_modem(&self, path: &str, properties: PropertyMap) -> &Self {
        self.modems
            .lock()
            .unwrap()
            .push((path.to_string(), properties));
        self
    }

    pub(crate) fn hold_enumeration(&self) -> oneshot::Sender<()> {
        self.script.lock().unwrap().hold()
    }

    pub(crate) fn fail_enumeration(&self, reason: &str) {
        self.script.lock().unwrap().fetch_error = Some(reason.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub(crate) fn is_subscribed(&self) -> bool {
        self.subscriber_count() > 0
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    pub(crate) fn emit_added(&self, path: &str, properties: PropertyMap) -> usize {
        self.emit(ModemEvent::Added {
            path: path.to_string(),
            properties,
        })
    }

    pub(crate) fn emit_removed(&self, path: &str) -> usize {
        self.emit(ModemEvent::Removed {
            path: path.to_string(),
        })
    }

    fn emit(&self, event: ModemEvent) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers
            .iter()
            .filter(|tx| tx.send(event.clone()).is_ok())
            .count()
    }
}

#[async_trait]
impl RemoteManager for MockManager {
    async fn get_modems(&self) -> Result<Vec<(String, PropertyMap)>, OfonoError> {
        let gate = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call::Fetch);
            script.take_gate()
        };
        pass_gate(gate).await;

        if let Some(reason) = self.script.lock().unwrap().fetch_error.clone() {
            return Err(OfonoError::OperationFailed {
                operation: "GetModems",
                reason,
            });
        }

        Ok(self.modems.lock().unwrap().clone())
    }

    async fn receive_modem_events(&self) -> Result<ModemEventStream, OfonoError> {
        self.script.lock().unwrap().calls.push(Call::Subscribe);

        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}

/// In-memory [`RemoteBus`].
pub(crate) struct MockBus {
    manager: Arc<MockManager>,
    objects: Mutex<HashMap<(String, Interface), Arc<MockObject>>>,
    unreachable: Mutex<HashSet<String>>,
    manager_unreachable: Mutex<bool>,
    manager_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockBus {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            manager: Arc::new(MockManager::new()),
            objects: Mutex::new(HashMap::new()),
            unreachable: Mutex::new(HashSet::new()),
            manager_unreachable: Mutex::new(false),
            manager_gate: Mutex::new(None),
        })
    }

    pub(crate) fn remote_manager(&self) -> Arc<MockManager> {
        Arc::clone(&self.manager)
    }

    /// The mock behind `path`/`interface`, created on first use.
    pub(crate) fn remote(&self, path: &str, interface: Interface) -> Arc<MockObject> {
        Arc::clone(
            self.objects
                .lock()
                .unwrap()
                .entry((path.to_string(), interface))
                .or_insert_with(|| Arc::new(MockObject::new(path))),
        )
    }

    /// Make proxy creation for `path` fail.
    pub(crate) fn make_unreachable(&self, path: &str) {
        self.unreachable.lock().unwrap().insert(path.to_string());
    }

    /// Hold the next manager binding until the returned sender fires or drops.
    pub(crate) fn hold_manager(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.manager_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub(crate) fn make_manager_unreachable(&self) {
        *self.manager_unreachable.lock().unwrap() = true;
    }
}

#[async_trait]
impl RemoteBus for MockBus {
    async fn manager(&self) -> Result<Arc<dyn RemoteManager>, OfonoError> {
        let gate = self.manager_gate.lock().unwrap().take();
        pass_gate(gate).await;

        if *self.manager_unreachable.lock().unwrap() {
            return Err(OfonoError::ProxyCreationFailed {
                interface: "org.ofono.Manager".to_string(),
                path: "/".to_string(),
                reason: "service unknown".to_string(),
            });
        }
        let manager: Arc<dyn RemoteManager> = self.remote_manager();
        Ok(manager)
    }

    async fn object(
        &self,
        path: &str,
        interface: Interface,
    ) -> Result<Arc<dyn RemoteObject>, OfonoError> {
        if self.unreachable.lock().unwrap().contains(path) {
            return Err(OfonoError::ProxyCreationFailed {
                interface: interface.name().to_string(),
                path: path.to_string(),
                reason: "object unknown".to_string(),
            });
        }
        let object: Arc<dyn RemoteObject> = self.remote(path, interface);
        Ok(object)
    }
}

/// Build a [`PropertyMap`] from literal pairs.
pub(crate) fn properties<const N: usize>(pairs: [(&str, PropertyValue); N]) -> PropertyMap {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Poll `condition` until it holds, letting spawned tasks run in between.
pub(crate) async fn eventually<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "condition not reached within timeout");
}

/// Give every ready task a chance to run.
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
