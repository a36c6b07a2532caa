//! Remote back end over the Alpaca HTTP protocol.

mod transport;
#[cfg(feature = "client")]
pub use transport::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, Transport};

mod transaction;
pub(crate) use transaction::*;

mod response;
pub(crate) use response::{Response, ensure_json, envelope_error};

use crate::api::{DeviceClient, DeviceType, TypedDevice};
use crate::capability::MemberSpec;
use crate::errors::{Error, Result};
use crate::params::{Method, Params};
use crate::session::{ClientSession, SessionOptions, TimeoutTier};
use eyre::{ContextCompat, WrapErr};
use mime::Mime;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::Instrument;

/// URL scheme of an Alpaca server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum Scheme {
    /// Plain HTTP.
    #[default]
    #[display("http")]
    Http,
    /// HTTP over TLS. Requires a transport with TLS support.
    #[display("https")]
    Https,
}

/// Location of an Alpaca server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    /// URL scheme.
    pub scheme: Scheme,
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerAddress {
    /// Plain HTTP server at the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: Scheme::Http,
            host: host.into(),
            port,
        }
    }

    fn base_url(&self) -> String {
        format!("{self}/")
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { scheme, host, port } = self;

        if host.contains(':') && !host.starts_with('[') {
            write!(f, "{scheme}://[{host}]:{port}")
        } else {
            write!(f, "{scheme}://{host}:{port}")
        }
    }
}

impl From<SocketAddr> for ServerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}

/// Turns member accesses into Alpaca HTTP transactions.
#[derive(Debug, Clone)]
pub(crate) struct TransportAdapter {
    transport: Arc<dyn Transport>,
    base_url: Arc<str>,
}

impl TransportAdapter {
    pub(crate) fn new(transport: Arc<dyn Transport>, server: &ServerAddress) -> Self {
        Self {
            transport,
            base_url: server.base_url().into(),
        }
    }

    /// Execute a device member.
    ///
    /// Transport failures never carry a device error number; they surface as
    /// [`ErrorOrigin::Transport`](crate::ErrorOrigin::Transport).
    pub(crate) async fn execute<T>(
        &self,
        session: &ClientSession,
        device_type: DeviceType,
        device_number: u32,
        member: &MemberSpec,
        params: &Params,
    ) -> Result<T>
    where
        Result<T>: Response,
    {
        let member_path = if session.options().strict_casing {
            member.name.to_ascii_lowercase()
        } else {
            member.name.to_owned()
        };

        self.request::<Result<T>>(
            session,
            &format!("api/v1/{device_type}/{device_number}/{member_path}"),
            member.kind.method(),
            member.tier,
            params,
        )
        .await
        .unwrap_or_else(|err| Err(Error::transport(&err)))
    }

    pub(crate) async fn request<Resp: Response>(
        &self,
        session: &ClientSession,
        path: &str,
        method: Method,
        tier: TimeoutTier,
        params: &Params,
    ) -> eyre::Result<Resp> {
        let options = session.options();
        let request_transaction = RequestTransaction::new(session);

        let span = tracing::debug_span!(
            "Alpaca transaction",
            path,
            %method,
            %tier,
            ?params,
            client_transaction_id = request_transaction.client_transaction_id,
            client_id = request_transaction.client_id,
        );

        async move {
            let result = async {
                let lowercase_keys = !options.strict_casing;
                let mut wire_params = params.to_wire(lowercase_keys);
                request_transaction.append_to(&mut wire_params, lowercase_keys);

                let mut request = HttpRequest {
                    method,
                    url: format!("{}{path}", self.base_url),
                    params: wire_params,
                    accept: mime::APPLICATION_JSON.as_ref(),
                    accept_encoding: None,
                    timeout: options.timeouts.get(tier),
                    tier,
                };
                Resp::prepare_request(&mut request, options);

                let response = self.transport.send(request).await?;

                eyre::ensure!(
                    (200..300).contains(&response.status),
                    "HTTP {}: {}",
                    response.status,
                    String::from_utf8_lossy(&response.body),
                );
                if let Some(encoding) = &response.content_encoding {
                    eyre::ensure!(
                        encoding.eq_ignore_ascii_case("identity"),
                        "response body is still {encoding}-encoded"
                    );
                }
                let mime_type = response
                    .content_type
                    .as_deref()
                    .context("Missing Content-Type header")?
                    .parse::<Mime>()?;

                let ResponseWithTransaction {
                    transaction: response_transaction,
                    response,
                } = Resp::from_http(&mime_type, &response.body)?;

                tracing::debug!(
                    server_transaction_id = response_transaction.server_transaction_id,
                    "Received response",
                );

                match response_transaction.client_transaction_id {
                    Some(received_client_transaction_id)
                        if received_client_transaction_id
                            != request_transaction.client_transaction_id.get() =>
                    {
                        tracing::warn!(
                            sent = request_transaction.client_transaction_id,
                            received = received_client_transaction_id,
                            "ClientTransactionID mismatch",
                        );
                    }
                    _ => {}
                }

                Ok::<_, eyre::Report>(response)
            }
            .await;

            if let Err(err) = &result {
                tracing::error!(%err, "Alpaca request failed");
            }

            result.wrap_err_with(|| format!("Failed to send Alpaca request to {path}"))
        }
        .instrument(span)
        .await
    }
}

/// One device on an Alpaca server, with its own client session.
#[derive(Debug)]
pub(crate) struct RemoteDevice {
    pub(crate) adapter: TransportAdapter,
    pub(crate) session: ClientSession,
    pub(crate) device_number: u32,
    connected: AtomicBool,
}

impl RemoteDevice {
    pub(crate) fn new(adapter: TransportAdapter, device_number: u32, options: SessionOptions) -> Self {
        Self {
            adapter,
            session: ClientSession::new(options),
            device_number,
            connected: AtomicBool::new(false),
        }
    }

    /// `Some(state)` when `Connected` is tracked on the client side.
    pub(crate) fn local_connection(&self) -> Option<&AtomicBool> {
        self.session
            .options()
            .manage_connection_locally
            .then_some(&self.connected)
    }

    pub(crate) async fn execute<T>(
        &self,
        device_type: DeviceType,
        member: &MemberSpec,
        params: &Params,
    ) -> Result<T>
    where
        Result<T>: Response,
    {
        self.adapter
            .execute(&self.session, device_type, self.device_number, member, params)
            .await
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FallibleDeviceType {
    Known(DeviceType),
    Unknown(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConfiguredDevice {
    device_name: String,
    device_type: FallibleDeviceType,
    device_number: u32,
    #[serde(rename = "UniqueID")]
    unique_id: String,
}

/// Entry of the server's configured device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredDevice {
    /// Device name.
    pub name: String,
    /// Device category.
    pub device_type: DeviceType,
    /// Device number within the category.
    pub device_number: u32,
    /// Unique ID of the device.
    pub unique_id: String,
}

/// Client for one Alpaca server.
#[derive(Debug, Clone)]
pub struct Client {
    adapter: TransportAdapter,
    options: SessionOptions,
    session: Arc<ClientSession>,
}

impl Client {
    /// Create a client using the bundled `reqwest` transport.
    #[cfg(feature = "client")]
    pub fn new(server: impl Into<ServerAddress>, options: SessionOptions) -> eyre::Result<Self> {
        Ok(Self::with_transport(
            server,
            Arc::new(ReqwestTransport::new()?),
            options,
        ))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(
        server: impl Into<ServerAddress>,
        transport: Arc<dyn Transport>,
        options: SessionOptions,
    ) -> Self {
        Self {
            adapter: TransportAdapter::new(transport, &server.into()),
            options,
            session: Arc::new(ClientSession::new(options)),
        }
    }

    /// Facade for a device on this server.
    ///
    /// Each facade gets its own client session.
    pub fn device(&self, device_type: DeviceType, device_number: u32) -> DeviceClient {
        DeviceClient::remote(
            device_type,
            RemoteDevice::new(self.adapter.clone(), device_number, self.options),
        )
    }

    /// Devices the server reports as configured.
    ///
    /// Categories unknown to this build are skipped.
    pub async fn configured_devices(&self) -> Result<Vec<ConfiguredDevice>> {
        let devices = self
            .adapter
            .request::<Result<Vec<RawConfiguredDevice>>>(
                &self.session,
                "management/v1/configureddevices",
                Method::Get,
                TimeoutTier::Standard,
                &Params::new(),
            )
            .await
            .unwrap_or_else(|err| Err(Error::transport(&err)))?;

        Ok(devices
            .into_iter()
            .filter_map(|device| match device.device_type {
                FallibleDeviceType::Known(device_type) => Some(ConfiguredDevice {
                    name: device.device_name,
                    device_type,
                    device_number: device.device_number,
                    unique_id: device.unique_id,
                }),
                FallibleDeviceType::Unknown(ty) => {
                    tracing::warn!(%ty, name = %device.device_name, "Skipping device with unsupported type");
                    None
                }
            })
            .collect())
    }

    /// Typed facades for every configured device.
    pub async fn get_devices(&self) -> Result<Vec<TypedDevice>> {
        Ok(self
            .configured_devices()
            .await?
            .into_iter()
            .map(|device| {
                self.device(device.device_type, device.device_number)
                    .into_typed()
            })
            .collect())
    }
}

#[cfg(test)]
mod test;
