use crate::macros::auto_increment;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Timeout class of a facade member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TimeoutTier {
    /// Connect and disconnect transitions.
    #[display("establish")]
    Establish,
    /// Ordinary property reads and writes.
    #[display("standard")]
    Standard,
    /// Operations expected to block for a while: exposures, image download, slews.
    #[display("long")]
    Long,
}

/// Per-tier request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    /// Timeout for [`TimeoutTier::Establish`].
    #[serde(with = "secs")]
    pub establish: Duration,
    /// Timeout for [`TimeoutTier::Standard`].
    #[serde(with = "secs")]
    pub standard: Duration,
    /// Timeout for [`TimeoutTier::Long`].
    #[serde(with = "secs")]
    pub long: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            establish: Duration::from_secs(5),
            standard: Duration::from_secs(10),
            long: Duration::from_secs(100),
        }
    }
}

impl Timeouts {
    /// Timeout for the given tier.
    pub const fn get(&self, tier: TimeoutTier) -> Duration {
        match tier {
            TimeoutTier::Establish => self.establish,
            TimeoutTier::Standard => self.standard,
            TimeoutTier::Long => self.long,
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Duration::try_from_secs_f64(f64::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// Encoding requested for the camera image array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ImageTransferMode {
    /// Nested JSON array inside the regular envelope.
    #[default]
    Json,
    /// `application/imagebytes` binary transfer, falling back to JSON if the server doesn't offer it.
    ImageBytes,
}

/// HTTP compression requested for the camera image array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ImageArrayCompression {
    /// No compression.
    #[default]
    None,
    /// `deflate`.
    Deflate,
    /// `gzip`.
    GZip,
    /// Either, at the server's discretion.
    GZipOrDeflate,
}

impl ImageArrayCompression {
    pub(crate) const fn accept_encoding(self) -> &'static str {
        match self {
            Self::None => "identity",
            Self::Deflate => "deflate",
            Self::GZip => "gzip",
            Self::GZipOrDeflate => "gzip, deflate",
        }
    }
}

/// Options of a remote client session.
///
/// ```
/// use ascom_device_access::{SessionOptions, ImageTransferMode};
///
/// let options = SessionOptions {
///     image_transfer: ImageTransferMode::ImageBytes,
///     ..Default::default()
/// };
/// assert!(options.strict_casing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOptions {
    /// Track `Connected` on the client instead of forwarding connection changes to the device.
    pub manage_connection_locally: bool,
    /// Send member paths and parameter names exactly in the Alpaca form
    /// (lower-case paths, PascalCase parameters).
    ///
    /// When off, the member path keeps its declared casing and parameter names
    /// are lower-cased instead, for servers that expect that.
    pub strict_casing: bool,
    /// Request timeouts.
    pub timeouts: Timeouts,
    /// Image array encoding.
    pub image_transfer: ImageTransferMode,
    /// Image array compression.
    pub image_compression: ImageArrayCompression,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            manage_connection_locally: false,
            strict_casing: true,
            timeouts: Timeouts::default(),
            image_transfer: ImageTransferMode::default(),
            image_compression: ImageArrayCompression::default(),
        }
    }
}

/// Identity of one remote device facade.
///
/// Holds the client number, which is unique among all sessions in the
/// process, and the transaction counter stamped on every request.
#[derive(Debug)]
pub struct ClientSession {
    client_id: NonZeroU32,
    transaction_counter: AtomicU32,
    options: SessionOptions,
}

impl ClientSession {
    /// Start a new session with a fresh client number.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            client_id: auto_increment!(),
            transaction_counter: AtomicU32::new(0),
            options,
        }
    }

    /// Client number sent as `ClientID`.
    pub const fn client_id(&self) -> NonZeroU32 {
        self.client_id
    }

    /// Session options.
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Allocate the next `ClientTransactionID`.
    pub(crate) fn next_transaction_id(&self) -> NonZeroU32 {
        NonZeroU32::MIN.saturating_add(self.transaction_counter.fetch_add(1, Ordering::Relaxed))
    }
}
