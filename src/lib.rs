/*!
Version-aware access to [ASCOM](https://ascom-standards.org/) astronomy devices.

Applications talk to one canonical facade per device category
([`api::Camera`], [`api::Telescope`], [`api::Switch`] and so on). Behind a
facade sits either a driver living in the same process or a device on an
[Alpaca](https://ascom-standards.org/Developer/Alpaca.htm) server, and the
facade behaves the same way for both:

- members introduced in newer interface versions are answered with their
  documented defaults when a local driver predates them;
- boolean-only switches are presented through the continuous value members;
- failures carry one of five [`ErrorKind`]s together with the raw diagnostic
  text, whichever back end produced them.

## Local drivers

Implement [`Driver`] for the handle to your driver and wrap it:

```no_run
# use ascom_device_access::{ASCOMResult, Driver, Params};
# use ascom_device_access::api::{DeviceClient, DeviceType};
# use serde_json::Value;
# use std::sync::Arc;
#[derive(Debug)]
struct MyFocuser;

#[async_trait::async_trait]
impl Driver for MyFocuser {
    async fn get(&self, member: &str, params: &Params) -> ASCOMResult<Value> {
        Ok(match member {
            "InterfaceVersion" => 3.into(),
            "Position" => 1200.into(),
            _ => return Err(ascom_device_access::ASCOMError::not_implemented(member)),
        })
    }
}

# async fn run() -> ascom_device_access::Result {
let focuser = DeviceClient::local(DeviceType::Focuser, Arc::new(MyFocuser)).into_typed();
# Ok(())
# }
```

## Remote devices

```no_run
# async fn run() -> eyre::Result<()> {
use ascom_device_access::api::TypedDevice;
use ascom_device_access::{Client, ServerAddress, SessionOptions};

let client = Client::new(ServerAddress::new("localhost", 11111), SessionOptions::default())?;

for device in client.get_devices().await? {
    if let TypedDevice::Telescope(telescope) = device {
        println!("Telescope at RA {}", telescope.right_ascension().await?);
    }
}
# Ok(())
# }
```

## Logging

Everything is reported through [`tracing`]. Each facade owns a span keyed by
its device category (and device number for remote devices), and every member
call is instrumented with a nested span.
*/

mod macros;

pub mod api;
mod capability;
mod client;
mod collection;
mod emulation;
mod errors;
mod params;
mod session;

#[cfg(test)]
mod test;

pub use capability::{CapabilityShim, Driver, Fallback, Introduced, MemberPolicy, MemberSpec};
#[cfg(feature = "client")]
pub use client::ReqwestTransport;
pub use client::{
    Client, ConfiguredDevice, HttpRequest, HttpResponse, Scheme, ServerAddress, Transport,
};
pub use collection::{CollectionError, Enumerator, OrdinalCollection};
pub use emulation::{SwitchState, SwitchValue, ValueEmulator};
pub use errors::{
    ASCOMError, ASCOMErrorCode, ASCOMResult, Error, ErrorKind, ErrorOrigin, Result,
    TRANSLATION_TABLE, translate,
};
pub use params::{MemberKind, Method, Params};
pub use session::{
    ClientSession, ImageArrayCompression, ImageTransferMode, SessionOptions, TimeoutTier, Timeouts,
};
