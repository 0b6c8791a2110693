//! [`RemoteBus`] backed by a zbus connection to the oFono daemon.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use tracing::{debug, instrument, warn};
use zbus::{Connection, proxy::CacheProperties, zvariant::OwnedValue};

use super::{
    OfonoError,
    proxy::{ManagerProxy, ModemProxy, NetworkRegistrationProxy},
    remote::{
        Interface, ModemEvent, ModemEventStream, PropertyChangeStream, PropertyMap, PropertyValue,
        RemoteBus, RemoteManager, RemoteObject,
    },
};
use crate::config::{BusKind, OfonoConfig};

/// Connection to oFono on the configured bus.
#[derive(Debug, Clone)]
pub struct OfonoBus {
    connection: Connection,
    service: String,
    manager_path: String,
}

impl OfonoBus {
    /// Connect to the bus named in `config`.
    ///
    /// # Errors
    /// Returns `OfonoError::ConnectionFailed` if the bus is unreachable.
    #[instrument]
    pub async fn connect(config: &OfonoConfig) -> Result<Self, OfonoError> {
        let connection = match config.bus {
            BusKind::System => Connection::system().await,
            BusKind::Session => Connection::session().await,
        }
        .map_err(|err| OfonoError::ConnectionFailed {
            bus: config.bus.to_string(),
            reason: err.to_string(),
        })?;

        debug!("Connected to the {} bus", config.bus);
        Ok(Self::with_connection(connection, config))
    }

    /// Use an existing connection.
    pub fn with_connection(connection: Connection, config: &OfonoConfig) -> Self {
        Self {
            connection,
            service: config.service.clone(),
            manager_path: config.manager_path.clone(),
        }
    }

    fn proxy_error(interface: &str, path: &str, err: zbus::Error) -> OfonoError {
        OfonoError::ProxyCreationFailed {
            interface: interface.to_string(),
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Build an uncached proxy of type `$proxy` for `$path`.
///
/// oFono publishes properties through its own `GetProperties` and
/// `PropertyChanged`, not `org.freedesktop.DBus.Properties`.
macro_rules! build_proxy {
    ($proxy:ty, $bus:expr, $path:expr, $interface:expr) => {
        async {
            let proxy = <$proxy>::builder(&$bus.connection)
                .destination($bus.service.clone())?
                .path($path.to_string())?
                .cache_properties(CacheProperties::No)
                .build()
                .await?;
            Ok::<_, zbus::Error>(proxy)
        }
        .await
        .map_err(|err| OfonoBus::proxy_error($interface, $path, err))
    };
}

#[async_trait]
impl RemoteBus for OfonoBus {
    async fn manager(&self) -> Result<Arc<dyn RemoteManager>, OfonoError> {
        let proxy = build_proxy!(
            ManagerProxy<'static>,
            self,
            self.manager_path.as_str(),
            "org.ofono.Manager"
        )?;

        let manager: Arc<dyn RemoteManager> = Arc::new(ManagerHandle { proxy });
        Ok(manager)
    }

    async fn object(
        &self,
        path: &str,
        interface: Interface,
    ) -> Result<Arc<dyn RemoteObject>, OfonoError> {
        let object: Arc<dyn RemoteObject> = match interface {
            Interface::Modem => {
                let proxy = build_proxy!(ModemProxy<'static>, self, path, interface.name())?;
                Arc::new(ModemHandle {
                    path: path.to_string(),
                    proxy,
                })
            }
            Interface::NetworkRegistration => {
                let proxy = build_proxy!(
                    NetworkRegistrationProxy<'static>,
                    self,
                    path,
                    interface.name()
                )?;
                Arc::new(NetworkRegistrationHandle {
                    path: path.to_string(),
                    proxy,
                })
            }
        };

        Ok(object)
    }
}

/// Convert a bus property dictionary, dropping values that cannot be represented.
fn convert_properties(path: &str, properties: HashMap<String, OwnedValue>) -> PropertyMap {
    properties
        .into_iter()
        .filter_map(|(name, value)| match PropertyValue::try_from(&*value) {
            Ok(value) => Some((name, value)),
            Err(err) => {
                warn!(path, %name, "dropping property: {err}");
                None
            }
        })
        .collect()
}

struct ManagerHandle {
    proxy: ManagerProxy<'static>,
}

#[async_trait]
impl RemoteManager for ManagerHandle {
    async fn get_modems(&self) -> Result<Vec<(String, PropertyMap)>, OfonoError> {
        let modems = self.proxy.get_modems().await?;

        Ok(modems
            .into_iter()
            .map(|(path, properties)| {
                let path = path.to_string();
                let properties = convert_properties(&path, properties);
                (path, properties)
            })
            .collect())
    }

    async fn receive_modem_events(&self) -> Result<ModemEventStream, OfonoError> {
        let added = self
            .proxy
            .receive_modem_added()
            .await?
            .filter_map(|signal| async move {
                let args = signal
                    .args()
                    .inspect_err(|err| warn!("Malformed ModemAdded signal: {err}"))
                    .ok()?;
                let path = args.path.to_string();
                let properties = convert_properties(&path, args.properties);
                Some(ModemEvent::Added { path, properties })
            });

        let removed = self
            .proxy
            .receive_modem_removed()
            .await?
            .filter_map(|signal| async move {
                let args = signal
                    .args()
                    .inspect_err(|err| warn!("Malformed ModemRemoved signal: {err}"))
                    .ok()?;
                Some(ModemEvent::Removed {
                    path: args.path.to_string(),
                })
            });

        Ok(stream::select(added, removed).boxed())
    }
}

/// Implement [`RemoteObject`] for a handle wrapping one of the property proxies.
macro_rules! property_handle {
    ($handle:ident, $proxy:ident) => {
        struct $handle {
            path: String,
            proxy: $proxy<'static>,
        }

        #[async_trait]
        impl RemoteObject for $handle {
            fn path(&self) -> &str {
                &self.path
            }

            async fn get_properties(&self) -> Result<PropertyMap, OfonoError> {
                let properties = self.proxy.get_properties().await?;
                Ok(convert_properties(&self.path, properties))
            }

            async fn set_property(
                &self,
                name: &str,
                value: PropertyValue,
            ) -> Result<(), OfonoError> {
                self.proxy.set_property(name, &value.to_value()).await?;
                Ok(())
            }

            async fn receive_property_changed(&self) -> Result<PropertyChangeStream, OfonoError> {
                let path = self.path.clone();
                let changes = self
                    .proxy
                    .receive_property_changed()
                    .await?
                    .filter_map(move |signal| {
                        let path = path.clone();
                        async move {
                            let args = signal
                                .args()
                                .inspect_err(|err| {
                                    warn!(%path, "Malformed PropertyChanged signal: {err}")
                                })
                                .ok()?;
                            match PropertyValue::try_from(&*args.value) {
                                Ok(value) => Some((args.name.clone(), value)),
                                Err(err) => {
                                    warn!(%path, name = %args.name, "dropping property: {err}");
                                    None
                                }
                            }
                        }
                    });

                Ok(changes.boxed())
            }
        }
    };
}

property_handle!(ModemHandle, ModemProxy);
property_handle!(NetworkRegistrationHandle, NetworkRegistrationProxy);
