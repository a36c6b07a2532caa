use super::DeviceType;
use super::macros::facade;
use crate::capability::{CapabilityShim, Driver, Fallback, Introduced, MemberPolicy, MemberSpec};
use crate::client::{RemoteDevice, Response};
use crate::errors::Result;
use crate::params::{MemberKind, Params};
use crate::session::{ClientSession, SessionOptions, TimeoutTier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Instrument;

/// Identifies one instrument and the back end that reaches it.
#[derive(Debug, Clone)]
pub enum DeviceEndpoint {
    /// Driver running in this process.
    Local {
        /// Device category.
        device_type: DeviceType,
        /// Driver handle.
        driver: Arc<dyn Driver>,
    },
    /// Device on an Alpaca server.
    Remote {
        /// Server location.
        server: crate::ServerAddress,
        /// Device category.
        device_type: DeviceType,
        /// Device number within the category.
        device_number: u32,
    },
}

#[derive(Debug)]
enum Backend {
    Local(CapabilityShim),
    Remote(RemoteDevice),
}

#[derive(Debug)]
struct DeviceInner {
    device_type: DeviceType,
    backend: Backend,
    span: tracing::Span,
}

/// Canonical facade over one device, whichever back end serves it.
///
/// Cheap to clone; clones share the back end and, for remote devices, the
/// client session.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    inner: Arc<DeviceInner>,
}

impl DeviceClient {
    /// Open a facade for the given endpoint.
    ///
    /// Remote endpoints use the bundled `reqwest` transport; see
    /// [`Client::with_transport`](crate::Client::with_transport) for custom ones.
    pub fn new(endpoint: DeviceEndpoint, options: SessionOptions) -> eyre::Result<Self> {
        Ok(match endpoint {
            DeviceEndpoint::Local {
                device_type,
                driver,
            } => Self::local(device_type, driver),
            #[cfg(feature = "client")]
            DeviceEndpoint::Remote {
                server,
                device_type,
                device_number,
            } => crate::Client::new(server, options)?.device(device_type, device_number),
            #[cfg(not(feature = "client"))]
            DeviceEndpoint::Remote { .. } => {
                let _ = options;
                eyre::bail!("remote endpoints need the `client` feature or a custom transport")
            }
        })
    }

    /// Facade for a local driver.
    pub fn local(device_type: DeviceType, driver: Arc<dyn Driver>) -> Self {
        let span = tracing::debug_span!("device", %device_type, backend = "local");

        Self::from_backend(
            device_type,
            Backend::Local(CapabilityShim::new(device_type, driver)),
            span,
        )
    }

    pub(crate) fn remote(device_type: DeviceType, remote: RemoteDevice) -> Self {
        let span = tracing::debug_span!(
            "device",
            %device_type,
            device_number = remote.device_number,
            client_id = remote.session.client_id(),
        );

        Self::from_backend(device_type, Backend::Remote(remote), span)
    }

    fn from_backend(device_type: DeviceType, backend: Backend, span: tracing::Span) -> Self {
        Self {
            inner: Arc::new(DeviceInner {
                device_type,
                backend,
                span,
            }),
        }
    }

    /// Device category.
    pub fn device_type(&self) -> DeviceType {
        self.inner.device_type
    }

    /// Client session of a remote device.
    pub fn client_session(&self) -> Option<&ClientSession> {
        match &self.inner.backend {
            Backend::Remote(remote) => Some(&remote.session),
            Backend::Local(_) => None,
        }
    }

    pub(crate) async fn exec<T>(&self, member: &MemberSpec, params: Params) -> Result<T>
    where
        Result<T>: Response,
    {
        let span = tracing::debug_span!(parent: &self.inner.span, "member", name = member.name);

        async {
            match &self.inner.backend {
                Backend::Local(shim) => shim
                    .call(member, params)
                    .await
                    .and_then(<Result<T>>::from_driver),
                Backend::Remote(remote) => {
                    remote
                        .execute(self.inner.device_type, member, &params)
                        .await
                }
            }
        }
        .instrument(span)
        .await
    }

    fn local_connection(&self) -> Option<&AtomicBool> {
        match &self.inner.backend {
            Backend::Remote(remote) => remote.local_connection(),
            Backend::Local(_) => None,
        }
    }

    fn track_connection(&self, state: &AtomicBool, connected: bool) {
        state.store(connected, Ordering::Release);
        tracing::debug!(parent: &self.inner.span, connected, "Connection state tracked locally");
    }

    /// Retrieves the connected state of the device.
    pub async fn connected(&self) -> Result<bool> {
        match self.local_connection() {
            Some(state) => Ok(state.load(Ordering::Acquire)),
            None => self.exec(&CONNECTED, Params::new()).await,
        }
    }

    /// Sets the connected state of the device.
    ///
    /// In locally managed mode only the client-side flag changes.
    pub async fn set_connected(&self, connected: bool) -> Result {
        match self.local_connection() {
            Some(state) => {
                self.track_connection(state, connected);
                Ok(())
            }
            None => {
                self.exec(&SET_CONNECTED, Params::new().with("Connected", connected)?)
                    .await
            }
        }
    }

    /// Starts connecting to the device.
    ///
    /// Drivers older than Platform 7 are connected through [`set_connected`](Self::set_connected) semantics.
    pub async fn connect(&self) -> Result {
        match self.local_connection() {
            Some(state) => {
                self.track_connection(state, true);
                Ok(())
            }
            None => self.exec(&CONNECT, Params::new()).await,
        }
    }

    /// Starts disconnecting from the device.
    pub async fn disconnect(&self) -> Result {
        match self.local_connection() {
            Some(state) => {
                self.track_connection(state, false);
                Ok(())
            }
            None => self.exec(&DISCONNECT, Params::new()).await,
        }
    }

    /// Returns true while the device is connecting or disconnecting.
    pub async fn connecting(&self) -> Result<bool> {
        match self.local_connection() {
            Some(_) => Ok(false),
            None => self.exec(&CONNECTING, Params::new()).await,
        }
    }
}

const CONNECTED: MemberSpec = MemberSpec {
    name: "Connected",
    kind: MemberKind::Get,
    tier: TimeoutTier::Standard,
    policy: MemberPolicy::Mandatory,
};

const SET_CONNECTED: MemberSpec = MemberSpec {
    name: "Connected",
    kind: MemberKind::Set,
    tier: TimeoutTier::Establish,
    policy: MemberPolicy::Mandatory,
};

const CONNECT: MemberSpec = MemberSpec {
    name: "Connect",
    kind: MemberKind::Invoke,
    tier: TimeoutTier::Establish,
    policy: MemberPolicy::Since {
        version: Introduced::Platform7,
        fallback: Fallback::Connection(true),
    },
};

const DISCONNECT: MemberSpec = MemberSpec {
    name: "Disconnect",
    kind: MemberKind::Invoke,
    tier: TimeoutTier::Establish,
    policy: MemberPolicy::Since {
        version: Introduced::Platform7,
        fallback: Fallback::Connection(false),
    },
};

const CONNECTING: MemberSpec = MemberSpec {
    name: "Connecting",
    kind: MemberKind::Get,
    tier: TimeoutTier::Standard,
    policy: MemberPolicy::Since {
        version: Introduced::Platform7,
        fallback: Fallback::Bool(false),
    },
};

facade! {
    impl DeviceClient with [CONNECTED, SET_CONNECTED, CONNECT, DISCONNECT, CONNECTING] {
        /// Invokes the specified device-specific custom action.
        ///
        /// The list of supported actions can be discovered through [`supported_actions`](Self::supported_actions).
        #[http("Action", method = Invoke)]
        pub async fn action(
            &self,
            #[http("Action")] action: String,
            #[http("Parameters")] parameters: String,
        ) -> Result<String>;

        /// Transmits an arbitrary string to the device and does not wait for a response.
        #[http("CommandBlind", method = Invoke)]
        #[deprecated(note = "Use the more flexible Action and SupportedActions mechanic.")]
        pub async fn command_blind(
            &self,
            #[http("Command")] command: String,
            #[http("Raw")] raw: bool,
        ) -> Result;

        /// Transmits an arbitrary string to the device and waits for a boolean response.
        #[http("CommandBool", method = Invoke)]
        #[deprecated(note = "Use the more flexible Action and SupportedActions mechanic.")]
        pub async fn command_bool(
            &self,
            #[http("Command")] command: String,
            #[http("Raw")] raw: bool,
        ) -> Result<bool>;

        /// Transmits an arbitrary string to the device and waits for a string response.
        #[http("CommandString", method = Invoke)]
        #[deprecated(note = "Use the more flexible Action and SupportedActions mechanic.")]
        pub async fn command_string(
            &self,
            #[http("Command")] command: String,
            #[http("Raw")] raw: bool,
        ) -> Result<String>;

        /// The description of the device.
        #[http("Description", method = Get, policy = mandatory)]
        pub async fn description(&self) -> Result<String>;

        /// All operational values that are definitively known.
        ///
        /// Devices that predate Platform 7 report an empty list.
        #[http("DeviceState", method = Get, policy = since platform7 => EmptyList)]
        pub async fn device_state(&self) -> Result<Vec<DeviceStateItem>>;

        /// The description of the driver.
        #[http("DriverInfo", method = Get, policy = mandatory)]
        pub async fn driver_info(&self) -> Result<String>;

        /// A string containing only the major and minor version of the driver.
        #[http("DriverVersion", method = Get, policy = mandatory)]
        pub async fn driver_version(&self) -> Result<String>;

        /// The version of the device interface contract this device complies with.
        #[http("InterfaceVersion", method = Get, policy = mandatory)]
        pub async fn interface_version(&self) -> Result<i32>;

        /// The name of the device.
        #[http("Name", method = Get, policy = mandatory)]
        pub async fn name(&self) -> Result<String>;

        /// Returns the list of action names supported by this driver.
        #[http("SupportedActions", method = Get)]
        pub async fn supported_actions(&self) -> Result<Vec<String>>;
    }
}

/// An operational property of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceStateItem {
    /// Property name, cased as in the interface definition.
    pub name: String,

    /// Property value.
    pub value: serde_json::Value,
}
