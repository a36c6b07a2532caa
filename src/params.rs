use crate::errors::{ASCOMError, ASCOMResult, Error, ErrorKind, ErrorOrigin};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;

/// How a facade member is accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Property read.
    Get,
    /// Property write.
    Set,
    /// Method call.
    Invoke,
}

/// HTTP method used for a member on the remote path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Method {
    /// Reads.
    #[display("GET")]
    Get,
    /// Writes and invocations.
    #[display("PUT")]
    Put,
}

impl MemberKind {
    pub(crate) const fn method(self) -> Method {
        match self {
            Self::Get => Method::Get,
            Self::Set | Self::Invoke => Method::Put,
        }
    }
}

/// Ordered member parameters.
///
/// Keys keep the casing they were declared with. Values are held as JSON so
/// that local drivers get typed values while the remote path can stringify
/// them into form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(IndexMap<Cow<'static, str>, Value>);

impl Params {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn insert(&mut self, name: impl Into<Cow<'static, str>>, value: impl Serialize) -> Result<(), Error> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|err| {
            Error::new(
                ErrorKind::InvalidArgument,
                ErrorOrigin::Client,
                format_args!("couldn't encode parameter {name}: {err}"),
            )
        })?;
        _ = self.0.insert(name, value);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Serialize) -> Result<Self, Error> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Look up a parameter by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Decode a parameter into a concrete type.
    ///
    /// Missing and mistyped parameters are reported as `INVALID_VALUE`, which
    /// is what local drivers should return for them.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> ASCOMResult<T> {
        let value = self
            .get(name)
            .ok_or_else(|| ASCOMError::invalid_value(format_args!("missing parameter {name}")))?;

        T::deserialize(value)
            .map_err(|err| ASCOMError::invalid_value(format_args!("parameter {name}: {err}")))
    }

    /// Iterate over parameters in declaration order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_ref(), value))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into form/query pairs.
    pub(crate) fn to_wire(&self, lowercase_keys: bool) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| {
                let key = if lowercase_keys {
                    key.to_ascii_lowercase()
                } else {
                    key.clone().into_owned()
                };
                (key, wire_value(value))
            })
            .collect()
    }
}

fn wire_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => (if *b { "True" } else { "False" }).to_owned(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_uses_alpaca_booleans() -> eyre::Result<()> {
        let params = Params::new()
            .with("Id", 3_i32)?
            .with("State", true)?
            .with("Value", 0.5_f64)?
            .with("Name", "heater")?;

        assert_eq!(
            params.to_wire(false),
            [
                ("Id".to_owned(), "3".to_owned()),
                ("State".to_owned(), "True".to_owned()),
                ("Value".to_owned(), "0.5".to_owned()),
                ("Name".to_owned(), "heater".to_owned()),
            ]
        );
        assert_eq!(params.to_wire(true)[1].0, "state");
        Ok(())
    }

    #[test]
    fn lookup_ignores_case() -> eyre::Result<()> {
        let params = Params::new().with("RightAscension", 12.5_f64)?;
        assert_eq!(params.decode::<f64>("rightascension")?, 12.5);
        assert_eq!(
            params.decode::<f64>("Declination").map_err(|err| err.code),
            Err(crate::ASCOMErrorCode::INVALID_VALUE)
        );
        Ok(())
    }
}
