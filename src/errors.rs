use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Alpaca representation of an ASCOM error code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ASCOMErrorCode(u16);

impl TryFrom<u16> for ASCOMErrorCode {
    type Error = eyre::Error;

    /// Convert a raw error code into an `ASCOMErrorCode` if it's in the valid range.
    fn try_from(raw: u16) -> eyre::Result<Self> {
        let range = BASE..=MAX;
        eyre::ensure!(
            range.contains(&raw),
            "Error code {raw:#X} is out of valid range ({range:#X?})",
        );
        Ok(Self(raw))
    }
}

/// The starting value for error numbers.
const BASE: u16 = 0x400;
/// The starting value for driver-specific error numbers.
const DRIVER_BASE: u16 = 0x500;
/// The maximum value for error numbers.
const MAX: u16 = 0xFFF;

impl ASCOMErrorCode {
    /// Generate ASCOM error code from a zero-based driver error code.
    ///
    /// Will panic if the driver error code is larger than the maximum allowed (2815).
    ///
    /// Local drivers typically define an enum for their own failures and convert
    /// it into an [`ASCOMError`] in a single place:
    ///
    /// ```
    /// use ascom_device_access::{ASCOMError, ASCOMErrorCode};
    ///
    /// #[derive(Debug)]
    /// enum MyDriverError {
    ///     PortError(std::io::Error),
    ///     InitializationError(String),
    /// }
    ///
    /// impl From<MyDriverError> for ASCOMError {
    ///     fn from(error: MyDriverError) -> Self {
    ///         match error {
    ///             MyDriverError::PortError(err) => {
    ///                 ASCOMError::new(ASCOMErrorCode::new_for_driver(0), err)
    ///             }
    ///             MyDriverError::InitializationError(msg) => {
    ///                 ASCOMError::new(ASCOMErrorCode::new_for_driver(1), msg)
    ///             }
    ///         }
    ///     }
    /// }
    /// ```
    pub const fn new_for_driver(driver_code: u16) -> Self {
        const DRIVER_MAX: u16 = MAX - DRIVER_BASE;

        assert!(driver_code <= DRIVER_MAX, "Driver error code is too large");

        Self(driver_code + DRIVER_BASE)
    }

    /// Get the driver-specific error code.
    ///
    /// Returns `Ok` with `0`-based driver error code if this is a driver error.
    /// Returns `Err` with raw error code if not a driver error.
    pub const fn as_driver_error(self) -> std::result::Result<u16, u16> {
        if let Some(driver_code) = self.0.checked_sub(DRIVER_BASE) {
            Ok(driver_code)
        } else {
            Err(self.0)
        }
    }

    /// Get the raw error code.
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Error reported by a local driver or found in a remote response envelope.
///
/// This is the raw, untranslated form. Facade calls never return it directly,
/// it always goes through [`translate`] first.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("ASCOM error {code}: {message}")]
pub struct ASCOMError {
    /// Error number.
    #[serde(rename = "ErrorNumber")]
    pub code: ASCOMErrorCode,
    /// Error message.
    #[serde(rename = "ErrorMessage")]
    pub message: Cow<'static, str>,
}

impl ASCOMError {
    /// Create a new `ASCOMError` from given error code and a message.
    pub fn new(code: ASCOMErrorCode, message: impl std::fmt::Display) -> Self {
        Self {
            code,
            message: message.to_string().into(),
        }
    }
}

/// Result type for local driver members.
pub type ASCOMResult<T = ()> = std::result::Result<T, ASCOMError>;

macro_rules! ascom_error_codes {
    ($(#[doc = $doc:literal] $name:ident = $value:literal,)*) => {
        impl ASCOMErrorCode {
            $(
                #[doc = $doc]
                pub const $name: Self = Self($value);
            )*
        }

        impl std::fmt::Debug for ASCOMErrorCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match *self {
                    $(
                        Self::$name => f.write_str(stringify!($name)),
                    )*
                    _ => match self.as_driver_error() {
                        Ok(driver_code) => write!(f, "DRIVER_ERROR[{driver_code}]"),
                        Err(raw_code) => write!(f, "{raw_code:#X}"),
                    },
                }
            }
        }

        impl std::fmt::Display for ASCOMErrorCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }

        impl ASCOMError {
            $(
                #[doc = $doc]
                pub const $name: Self = Self {
                    code: ASCOMErrorCode::$name,
                    message: Cow::Borrowed(ascom_error_codes!(@msg $name $doc)),
                };
            )*
        }
    };

    (@msg OK $doc:literal) => ("");
    (@msg $name:ident $doc:literal) => ($doc);
}

ascom_error_codes! {
    #[doc = "Success"]
    OK = 0,
    #[doc = "The requested action is not implemented in this driver"]
    ACTION_NOT_IMPLEMENTED = 0x40C,
    #[doc = "The requested operation can not be undertaken at this time"]
    INVALID_OPERATION = 0x40B,
    #[doc = "Invalid value"]
    INVALID_VALUE = 0x401,
    #[doc = "The attempted operation is invalid because the mount is currently in a Parked state"]
    INVALID_WHILE_PARKED = 0x408,
    #[doc = "The attempted operation is invalid because the mount is currently in a Slaved state"]
    INVALID_WHILE_SLAVED = 0x409,
    #[doc = "The communications channel is not connected"]
    NOT_CONNECTED = 0x407,
    #[doc = "Property or method not implemented"]
    NOT_IMPLEMENTED = 0x400,
    #[doc = "A value has not been set"]
    VALUE_NOT_SET = 0x402,
}

impl ASCOMError {
    /// Create a new "invalid operation" error with the specified message.
    pub fn invalid_operation(message: impl std::fmt::Display) -> Self {
        Self::new(ASCOMErrorCode::INVALID_OPERATION, message)
    }

    /// Create a new "invalid value" error with the specified message.
    pub fn invalid_value(message: impl std::fmt::Display) -> Self {
        Self::new(ASCOMErrorCode::INVALID_VALUE, message)
    }

    /// Create a new "not implemented" error naming the missing member.
    pub fn not_implemented(member: &str) -> Self {
        Self::new(
            ASCOMErrorCode::NOT_IMPLEMENTED,
            format_args!("{member} is not implemented by this driver"),
        )
    }
}

/// The single failure taxonomy surfaced by every facade member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorKind {
    /// The member is not implemented by the back end.
    #[display("unsupported operation")]
    UnsupportedOperation,
    /// An argument was rejected.
    #[display("invalid argument")]
    InvalidArgument,
    /// The device is not connected.
    #[display("not connected")]
    NotConnected,
    /// The device is in a state that forbids the operation (parked, slaved, busy...).
    #[display("invalid state")]
    InvalidState,
    /// Anything else, including transport faults and timeouts.
    #[display("driver failure")]
    DriverFailure,
}

/// Where a failure was first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorOrigin {
    /// Reported by a remote device inside a response envelope.
    #[display("device")]
    Device,
    /// Reported by a local driver.
    #[display("driver")]
    Driver,
    /// HTTP transport, timeout, or an envelope that could not be decoded.
    #[display("transport")]
    Transport,
    /// Raised on the client side before anything was sent.
    #[display("client")]
    Client,
}

/// Error returned by facade members.
#[derive(Debug, Clone, Error)]
#[error("{kind} ({origin}): {message}")]
pub struct Error {
    kind: ErrorKind,
    origin: ErrorOrigin,
    raw_code: Option<i32>,
    message: Cow<'static, str>,
}

/// Result type for facade members.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// Fixed mapping from raw error codes to taxonomy kinds.
///
/// Codes not listed here translate to [`ErrorKind::DriverFailure`].
pub const TRANSLATION_TABLE: &[(ASCOMErrorCode, ErrorKind)] = &[
    (ASCOMErrorCode::NOT_IMPLEMENTED, ErrorKind::UnsupportedOperation),
    (ASCOMErrorCode::ACTION_NOT_IMPLEMENTED, ErrorKind::UnsupportedOperation),
    (ASCOMErrorCode::INVALID_VALUE, ErrorKind::InvalidArgument),
    (ASCOMErrorCode::NOT_CONNECTED, ErrorKind::NotConnected),
    (ASCOMErrorCode::VALUE_NOT_SET, ErrorKind::InvalidState),
    (ASCOMErrorCode::INVALID_WHILE_PARKED, ErrorKind::InvalidState),
    (ASCOMErrorCode::INVALID_WHILE_SLAVED, ErrorKind::InvalidState),
    (ASCOMErrorCode::INVALID_OPERATION, ErrorKind::InvalidState),
];

/// Map a back-end failure onto the taxonomy.
///
/// Total: unknown and out-of-range codes become [`ErrorKind::DriverFailure`].
/// The raw message is kept verbatim.
pub fn translate(
    raw_code: i32,
    raw_message: impl Into<Cow<'static, str>>,
    origin: ErrorOrigin,
) -> Error {
    let kind = TRANSLATION_TABLE
        .iter()
        .find(|(code, _)| i32::from(code.raw()) == raw_code)
        .map_or(ErrorKind::DriverFailure, |&(_, kind)| kind);

    Error {
        kind,
        origin,
        raw_code: Some(raw_code),
        message: raw_message.into(),
    }
}

impl Error {
    /// Create an error that didn't originate from a numeric code.
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl std::fmt::Display) -> Self {
        Self {
            kind,
            origin,
            raw_code: None,
            message: message.to_string().into(),
        }
    }

    /// Transport-level failure: connection, timeout, HTTP status or a malformed envelope.
    pub(crate) fn transport(err: &eyre::Report) -> Self {
        Self::new(ErrorKind::DriverFailure, ErrorOrigin::Transport, format_args!("{err:#}"))
    }

    /// "Unsupported" raised by this crate itself on behalf of the back end.
    pub(crate) fn unsupported(origin: ErrorOrigin, member: &str) -> Self {
        Self {
            kind: ErrorKind::UnsupportedOperation,
            origin,
            raw_code: Some(ASCOMErrorCode::NOT_IMPLEMENTED.raw().into()),
            message: format!("{member} is not supported by this device").into(),
        }
    }

    /// Taxonomy kind.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Where the failure was observed.
    pub const fn origin(&self) -> ErrorOrigin {
        self.origin
    }

    /// Raw numeric code as reported by the back end, if there was one.
    pub const fn raw_code(&self) -> Option<i32> {
        self.raw_code
    }

    /// Original diagnostic text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for `kind() == ErrorKind::UnsupportedOperation`.
    pub fn is_unsupported(&self) -> bool {
        self.kind == ErrorKind::UnsupportedOperation
    }
}

impl From<ASCOMError> for Error {
    fn from(err: ASCOMError) -> Self {
        translate(err.code.raw().into(), err.message, ErrorOrigin::Driver)
    }
}

/// Extracts the success type of a facade member's return type.
pub(crate) trait ResultOk {
    type Ok;
}

impl<T> ResultOk for Result<T> {
    type Ok = T;
}
