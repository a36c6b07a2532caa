use super::macros::facade;
use crate::errors::Result;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde_repr::{Deserialize_repr, Serialize_repr};

facade! {
    /// Dome facade.
    pub struct Dome {
        /// Stops any shutter or dome motion.
        #[http("AbortSlew", method = Invoke, policy = mandatory)]
        pub async fn abort_slew(&self) -> Result;

        /// Shutter altitude in degrees.
        #[http("Altitude", method = Get)]
        pub async fn altitude(&self) -> Result<f64>;

        /// Whether the dome is at its home position.
        #[http("AtHome", method = Get)]
        pub async fn at_home(&self) -> Result<bool>;

        /// Whether the dome is parked.
        #[http("AtPark", method = Get)]
        pub async fn at_park(&self) -> Result<bool>;

        /// Dome azimuth in degrees, North-referenced, positive East.
        #[http("Azimuth", method = Get)]
        pub async fn azimuth(&self) -> Result<f64>;

        /// Whether [`find_home`](Self::find_home) is supported.
        #[http("CanFindHome", method = Get, policy = mandatory)]
        pub async fn can_find_home(&self) -> Result<bool>;

        /// Whether [`park`](Self::park) is supported.
        #[http("CanPark", method = Get, policy = mandatory)]
        pub async fn can_park(&self) -> Result<bool>;

        /// Whether the shutter altitude can be set.
        #[http("CanSetAltitude", method = Get, policy = mandatory)]
        pub async fn can_set_altitude(&self) -> Result<bool>;

        /// Whether the dome azimuth can be set.
        #[http("CanSetAzimuth", method = Get, policy = mandatory)]
        pub async fn can_set_azimuth(&self) -> Result<bool>;

        /// Whether [`set_park`](Self::set_park) is supported.
        #[http("CanSetPark", method = Get, policy = mandatory)]
        pub async fn can_set_park(&self) -> Result<bool>;

        /// Whether the shutter can be opened and closed.
        #[http("CanSetShutter", method = Get, policy = mandatory)]
        pub async fn can_set_shutter(&self) -> Result<bool>;

        /// Whether the dome can be slaved to a telescope.
        #[http("CanSlave", method = Get, policy = mandatory)]
        pub async fn can_slave(&self) -> Result<bool>;

        /// Whether the dome azimuth can be synced.
        #[http("CanSyncAzimuth", method = Get, policy = mandatory)]
        pub async fn can_sync_azimuth(&self) -> Result<bool>;

        /// Starts closing the shutter.
        #[http("CloseShutter", method = Invoke)]
        pub async fn close_shutter(&self) -> Result;

        /// Moves the dome to its home position.
        #[http("FindHome", method = Invoke, tier = Long)]
        pub async fn find_home(&self) -> Result;

        /// Starts opening the shutter.
        #[http("OpenShutter", method = Invoke)]
        pub async fn open_shutter(&self) -> Result;

        /// Moves the dome to its park position.
        #[http("Park", method = Invoke, tier = Long)]
        pub async fn park(&self) -> Result;

        /// Marks the current azimuth as the park position.
        #[http("SetPark", method = Invoke)]
        pub async fn set_park(&self) -> Result;

        /// Shutter state.
        #[http("ShutterStatus", method = Get)]
        pub async fn shutter_status(&self) -> Result<ShutterState>;

        /// Whether the dome is slaved to a telescope.
        #[http("Slaved", method = Get, policy = mandatory)]
        pub async fn slaved(&self) -> Result<bool>;

        /// Slaves the dome to a telescope or releases it.
        #[http("Slaved", method = Set)]
        pub async fn set_slaved(&self, #[http("Slaved")] slaved: bool) -> Result;

        /// Starts moving the shutter to the given altitude.
        #[http("SlewToAltitude", method = Invoke)]
        pub async fn slew_to_altitude(&self, #[http("Altitude")] altitude: f64) -> Result;

        /// Starts rotating the dome to the given azimuth.
        #[http("SlewToAzimuth", method = Invoke)]
        pub async fn slew_to_azimuth(&self, #[http("Azimuth")] azimuth: f64) -> Result;

        /// Whether any part of the dome is moving.
        #[http("Slewing", method = Get, policy = mandatory)]
        pub async fn slewing(&self) -> Result<bool>;

        /// Syncs the dome azimuth to the given angle.
        #[http("SyncToAzimuth", method = Invoke)]
        pub async fn sync_to_azimuth(&self, #[http("Azimuth")] azimuth: f64) -> Result;
    }
}

/// State of the dome shutter.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum ShutterState {
    /// Open.
    Open = 0,
    /// Closed.
    Closed = 1,
    /// Opening.
    Opening = 2,
    /// Closing.
    Closing = 3,
    /// Failed or unknown.
    Error = 4,
}
