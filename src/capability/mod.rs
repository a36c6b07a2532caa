//! Version-aware access to local drivers.
//!
//! Every facade member carries a static [`MemberSpec`]. For local drivers the
//! [`CapabilityShim`] consults its [`MemberPolicy`] together with the driver's
//! live `InterfaceVersion` to decide between calling through, substituting a
//! documented default, or reporting the member as unsupported.

mod shim;
pub use shim::CapabilityShim;

use crate::api::DeviceType;
use crate::errors::{ASCOMError, ASCOMResult};
use crate::params::{MemberKind, Params};
use crate::session::TimeoutTier;
use serde_json::Value;
use std::fmt::Debug;

/// Interface version that introduced a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Introduced {
    /// A fixed interface version of the device category.
    In(i32),
    /// The category's first ASCOM Platform 7 interface version.
    Platform7,
}

impl Introduced {
    /// Resolve into a concrete interface version for the given category.
    pub const fn version_for(self, device_type: DeviceType) -> i32 {
        match self {
            Self::In(version) => version,
            Self::Platform7 => device_type.platform7_interface_version(),
        }
    }
}

/// What a version-gated member does on drivers older than its introduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// Report [`UnsupportedOperation`](crate::ErrorKind::UnsupportedOperation).
    Unsupported,
    /// Return a fixed boolean.
    Bool(bool),
    /// Return a fixed integer.
    Int(i32),
    /// Return a fixed floating-point number.
    Double(f64),
    /// Return a fixed string.
    Str(&'static str),
    /// Return an empty list.
    EmptyList,
    /// Return a fixed list of integers.
    IntList(&'static [i32]),
    /// Emulate through the `Connected` property, setting it to the given value.
    Connection(bool),
}

impl Fallback {
    /// Fixed value substituted for the member, if this fallback has one.
    pub fn value(self) -> Option<Value> {
        Some(match self {
            Self::Unsupported | Self::Connection(_) => return None,
            Self::Bool(b) => b.into(),
            Self::Int(i) => i.into(),
            Self::Double(d) => d.into(),
            Self::Str(s) => s.into(),
            Self::EmptyList => Value::Array(Vec::new()),
            Self::IntList(items) => items.iter().copied().map(Value::from).collect(),
        })
    }
}

/// Availability rule of a facade member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberPolicy {
    /// Always present. Failures propagate as reported.
    Mandatory,
    /// Present from the given interface version on; older drivers get the fallback.
    Since {
        /// First version with the member.
        version: Introduced,
        /// Behaviour on older drivers.
        fallback: Fallback,
    },
    /// May be unsupported at any version; the driver's own signal propagates.
    Optional,
}

/// Static description of a facade member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberSpec {
    /// Member name as declared by the device interface (PascalCase).
    pub name: &'static str,
    /// Read, write or call.
    pub kind: MemberKind,
    /// Timeout class used on the remote path.
    pub tier: TimeoutTier,
    /// Availability rule used on the local path.
    pub policy: MemberPolicy,
}

/// Late-bound handle to a local driver.
///
/// Members are addressed by their PascalCase interface name. Parameters are
/// passed with their declared names, see [`Params::decode`].
///
/// Return values follow the JSON shape of the corresponding Alpaca `Value`:
/// numbers, booleans, strings, arrays, objects for structured items and
/// nested numeric arrays for the image array. Drivers report failures with
/// [`ASCOMError`], using `NOT_IMPLEMENTED` for members they don't have.
#[async_trait::async_trait]
pub trait Driver: Debug + Send + Sync {
    /// Read a property.
    async fn get(&self, member: &str, params: &Params) -> ASCOMResult<Value>;

    /// Write a property.
    async fn set(&self, member: &str, params: &Params) -> ASCOMResult {
        let _ = params;
        Err(ASCOMError::not_implemented(member))
    }

    /// Call a method.
    async fn invoke(&self, member: &str, params: &Params) -> ASCOMResult<Value> {
        let _ = params;
        Err(ASCOMError::not_implemented(member))
    }
}
