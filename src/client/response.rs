use super::{HttpRequest, ResponseTransaction, ResponseWithTransaction};
use crate::errors::{Error, ErrorKind, ErrorOrigin, Result, translate};
use crate::session::SessionOptions;
use mime::Mime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::TypeId;

/// Value type a facade member can return.
///
/// Implemented on the member's full `Result` so that decoding can produce
/// device errors alongside values.
pub(crate) trait Response: Sized {
    /// Adjust headers before the request goes out.
    fn prepare_request(request: &mut HttpRequest, options: &SessionOptions) {
        let _ = (request, options);
    }

    /// Decode a remote response body.
    fn from_http(mime_type: &Mime, bytes: &[u8]) -> eyre::Result<ResponseWithTransaction<Self>>;

    /// Decode a value returned by a local driver.
    fn from_driver(value: Value) -> Self;
}

#[derive(Deserialize)]
struct EnvelopeError {
    #[serde(rename = "ErrorNumber", default)]
    code: i32,
    #[serde(rename = "ErrorMessage", default)]
    message: String,
}

#[derive(Deserialize)]
struct ValueEnvelope<T> {
    #[serde(rename = "Value", default = "Option::default")]
    value: Option<T>,
}

pub(crate) fn ensure_json(mime_type: &Mime) -> eyre::Result<()> {
    eyre::ensure!(
        mime_type.essence_str() == mime::APPLICATION_JSON.as_ref(),
        "Expected JSON response, got {mime_type}"
    );
    match mime_type.get_param(mime::CHARSET) {
        Some(mime::UTF_8) | None => Ok(()),
        Some(charset) => eyre::bail!("Unsupported charset {charset}"),
    }
}

fn is_unit<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<()>()
}

/// Decode the `ErrorNumber`/`ErrorMessage` pair of an envelope.
///
/// `Ok(())` when the envelope reports success.
pub(crate) fn envelope_error(bytes: &[u8]) -> eyre::Result<Result> {
    let EnvelopeError { code, message } = serde_json::from_slice(bytes)?;
    Ok(match code {
        0 => Ok(()),
        code => Err(translate(code, message, ErrorOrigin::Device)),
    })
}

impl<T: 'static + DeserializeOwned> Response for Result<T> {
    fn from_http(mime_type: &Mime, bytes: &[u8]) -> eyre::Result<ResponseWithTransaction<Self>> {
        ensure_json(mime_type)?;

        let transaction = serde_json::from_slice::<ResponseTransaction>(bytes)?;

        let response = match envelope_error(bytes)? {
            Err(err) => Err(err),
            // Void members may carry anything (or nothing) in `Value`.
            Ok(()) if is_unit::<T>() => Ok(serde_json::from_value(Value::Null)?),
            Ok(()) => match serde_json::from_slice::<ValueEnvelope<T>>(bytes)?.value {
                Some(value) => Ok(value),
                None => Ok(serde_json::from_value(Value::Null)
                    .map_err(|err| eyre::eyre!("response has no Value: {err}"))?),
            },
        };

        Ok(ResponseWithTransaction {
            transaction,
            response,
        })
    }

    fn from_driver(value: Value) -> Self {
        let value = if is_unit::<T>() { Value::Null } else { value };

        T::deserialize(value).map_err(|err| {
            Error::new(
                ErrorKind::DriverFailure,
                ErrorOrigin::Driver,
                format_args!("driver returned an unexpected value: {err}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: 'static + DeserializeOwned>(body: &str) -> eyre::Result<Result<T>> {
        Ok(<Result<T>>::from_http(&mime::APPLICATION_JSON, body.as_bytes())?.response)
    }

    #[test]
    fn device_errors_are_translated() -> eyre::Result<()> {
        let err = decode::<bool>(
            r#"{"Value":false,"ErrorNumber":1032,"ErrorMessage":"parked","ClientTransactionID":3}"#,
        )?
        .expect_err("envelope carries an error");
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(err.origin(), ErrorOrigin::Device);
        assert_eq!(err.raw_code(), Some(0x408));
        assert_eq!(err.message(), "parked");
        Ok(())
    }

    #[test]
    fn unit_members_ignore_value() -> eyre::Result<()> {
        decode::<()>(r#"{"ErrorNumber":0,"ErrorMessage":""}"#)??;
        decode::<()>(r#"{"Value":"whatever","ErrorNumber":0,"ErrorMessage":""}"#)??;
        Ok(())
    }

    #[test]
    fn missing_value_is_a_decode_error() {
        assert!(decode::<f64>(r#"{"ErrorNumber":0,"ErrorMessage":""}"#).is_err());
        assert!(decode::<f64>(r#"{"Value":"abc","ErrorNumber":0}"#).is_err());
    }

    #[test]
    fn non_json_is_rejected() {
        assert!(<Result<i32>>::from_http(&mime::TEXT_PLAIN, b"Value=1").is_err());
    }
}
