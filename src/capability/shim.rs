use super::{Driver, Fallback, MemberPolicy, MemberSpec};
use crate::api::DeviceType;
use crate::errors::{ASCOMErrorCode, Error, ErrorKind, ErrorOrigin, Result};
use crate::params::{MemberKind, Params};
use serde_json::Value;
use std::sync::Arc;

const INTERFACE_VERSION: &str = "InterfaceVersion";

/// Version-aware wrapper around a local [`Driver`].
#[derive(Debug, Clone)]
pub struct CapabilityShim {
    device_type: DeviceType,
    driver: Arc<dyn Driver>,
}

impl CapabilityShim {
    /// Wrap a driver of the given category.
    pub fn new(device_type: DeviceType, driver: Arc<dyn Driver>) -> Self {
        Self {
            device_type,
            driver,
        }
    }

    /// Device category of the wrapped driver.
    pub const fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Interface version reported by the driver right now.
    ///
    /// Drivers that predate the property are treated as version 1.
    pub async fn interface_version(&self) -> Result<i32> {
        match self.driver.get(INTERFACE_VERSION, &Params::new()).await {
            Ok(value) => serde_json::from_value(value).map_err(|err| {
                Error::new(
                    ErrorKind::DriverFailure,
                    ErrorOrigin::Driver,
                    format_args!("driver reported a non-integer InterfaceVersion: {err}"),
                )
            }),
            Err(err) if err.code == ASCOMErrorCode::NOT_IMPLEMENTED => Ok(1),
            Err(err) => Err(err.into()),
        }
    }

    /// Read a property by name.
    pub async fn get(&self, name: &str, params: Params) -> Result<Value> {
        self.call_by_name(name, MemberKind::Get, params).await
    }

    /// Write a property by name.
    pub async fn set(&self, name: &str, params: Params) -> Result {
        self.call_by_name(name, MemberKind::Set, params).await.map(drop)
    }

    /// Call a method by name.
    pub async fn invoke(&self, name: &str, params: Params) -> Result<Value> {
        self.call_by_name(name, MemberKind::Invoke, params).await
    }

    async fn call_by_name(&self, name: &str, kind: MemberKind, params: Params) -> Result<Value> {
        match self.device_type.member(name, kind) {
            Some(member) => self.call(member, params).await,
            // Not in the static table: nothing to gate on.
            None => self.dispatch(name, kind, &params).await,
        }
    }

    /// Apply the member's policy and call through if it allows.
    pub async fn call(&self, member: &MemberSpec, params: Params) -> Result<Value> {
        if member.kind == MemberKind::Get && member.name == INTERFACE_VERSION {
            return self.interface_version().await.map(Value::from);
        }

        match member.policy {
            MemberPolicy::Optional => self.dispatch(member.name, member.kind, &params).await,
            MemberPolicy::Mandatory => {
                let result = self.dispatch(member.name, member.kind, &params).await;
                if matches!(&result, Err(err) if err.is_unsupported()) {
                    tracing::warn!(
                        member = member.name,
                        "driver reports a mandatory member as not implemented"
                    );
                }
                result
            }
            MemberPolicy::Since { version, fallback } => {
                let required = version.version_for(self.device_type);
                let actual = self.interface_version().await?;

                if actual >= required {
                    return self.dispatch(member.name, member.kind, &params).await;
                }

                tracing::debug!(
                    member = member.name,
                    actual,
                    required,
                    ?fallback,
                    "member predates driver interface, applying fallback"
                );

                self.fallback(member, fallback).await
            }
        }
    }

    async fn fallback(&self, member: &MemberSpec, fallback: Fallback) -> Result<Value> {
        match fallback {
            Fallback::Unsupported => Err(Error::unsupported(ErrorOrigin::Driver, member.name)),
            Fallback::Connection(connected) => {
                let params = Params::new().with("Connected", connected)?;
                _ = self.dispatch("Connected", MemberKind::Set, &params).await?;
                Ok(Value::Null)
            }
            other => Ok(other.value().unwrap_or_default()),
        }
    }

    async fn dispatch(&self, name: &str, kind: MemberKind, params: &Params) -> Result<Value> {
        let result = match kind {
            MemberKind::Get => self.driver.get(name, params).await,
            MemberKind::Set => self.driver.set(name, params).await.map(|()| Value::Null),
            MemberKind::Invoke => self.driver.invoke(name, params).await,
        };
        result.map_err(Error::from)
    }
}
