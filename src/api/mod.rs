/*!
Canonical device facades.

Every device category gets a facade type that exposes the newest interface
contract of that category, regardless of whether the device behind it is a
local driver or a device on an Alpaca server.

## Local drivers
Calls go through a [`CapabilityShim`](crate::CapabilityShim), which asks the
driver for its live `InterfaceVersion` before touching any member introduced
after version 1. Members the driver predates get their documented default
(or an "unsupported" error) without reaching the driver at all.

## Remote devices
Calls become Alpaca HTTP transactions of the form
**http://host:port/api/v1/{device_type}/{device_number}/{member}**. Reads use
`GET` with parameters in the query string, writes and method calls use `PUT`
with a form body. Remote servers are trusted to implement their own
interface version, so nothing is gated on the client side.

## Errors
Whatever the back end, failures surface as [`Error`](crate::Error) with one
of five [`ErrorKind`](crate::ErrorKind)s and an
[`ErrorOrigin`](crate::ErrorOrigin) telling device, driver, transport and
client faults apart.
*/

#![expect(clippy::doc_markdown)]

#[cfg(any(feature = "camera", feature = "telescope"))]
mod guide;
#[cfg(any(feature = "camera", feature = "telescope"))]
pub use guide::GuideDirection;

#[cfg(any(feature = "camera", feature = "telescope"))]
mod time_repr;

mod macros;
use macros::device_types;

/// Members shared by all device categories.
pub mod device;
pub use device::{DeviceClient, DeviceEndpoint, DeviceStateItem};

#[cfg(feature = "camera")]
mod camera;
#[cfg(feature = "camera")]
pub use camera::{
    Camera, CameraState, ImageArray, ImageArrayRank, ImageElementType, ImagePixels, SensorType,
};

#[cfg(feature = "dome")]
mod dome;
#[cfg(feature = "dome")]
pub use dome::{Dome, ShutterState};

#[cfg(feature = "filter_wheel")]
mod filter_wheel;
#[cfg(feature = "filter_wheel")]
pub use filter_wheel::FilterWheel;

#[cfg(feature = "focuser")]
mod focuser;
#[cfg(feature = "focuser")]
pub use focuser::Focuser;

#[cfg(feature = "rotator")]
mod rotator;
#[cfg(feature = "rotator")]
pub use rotator::Rotator;

#[cfg(feature = "switch")]
mod switch;
#[cfg(feature = "switch")]
pub use switch::Switch;

#[cfg(feature = "telescope")]
mod telescope;
#[cfg(feature = "telescope")]
pub use telescope::{
    AlignmentMode, AxisRate, DriveRate, EquatorialCoordinateType, PierSide, Telescope, TelescopeAxis,
};

device_types! {
    #[cfg(feature = "camera")]
    Camera = "camera", platform7 = 4;

    #[cfg(feature = "dome")]
    Dome = "dome", platform7 = 3;

    #[cfg(feature = "filter_wheel")]
    FilterWheel = "filterwheel", platform7 = 3;

    #[cfg(feature = "focuser")]
    Focuser = "focuser", platform7 = 4;

    #[cfg(feature = "rotator")]
    Rotator = "rotator", platform7 = 4;

    #[cfg(feature = "switch")]
    Switch = "switch", platform7 = 3;

    #[cfg(feature = "telescope")]
    Telescope = "telescope", platform7 = 4;
}
