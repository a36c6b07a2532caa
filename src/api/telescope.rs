use super::guide::GuideDirection;

use super::macros::facade;
use super::time_repr::{Iso8601, TimeRepr};
use crate::collection::OrdinalCollection;
use crate::errors::Result;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::time::SystemTime;

facade! {
    /// Telescope facade.
    ///
    /// Synchronous slews, parking and homing use the long timeout tier. Their
    /// asynchronous variants return as soon as the mount accepts the command;
    /// completion is observed through [`slewing`](Self::slewing).
    pub struct Telescope {
        /// Stops any slew in progress.
        #[http("AbortSlew", method = Invoke, policy = mandatory)]
        pub async fn abort_slew(&self) -> Result;

        /// Mount geometry.
        #[http("AlignmentMode", method = Get)]
        pub async fn alignment_mode(&self) -> Result<AlignmentMode>;

        /// Altitude above the local horizon in degrees.
        #[http("Altitude", method = Get)]
        pub async fn altitude(&self) -> Result<f64>;

        /// Effective aperture area in square meters.
        #[http("ApertureArea", method = Get)]
        pub async fn aperture_area(&self) -> Result<f64>;

        /// Effective aperture diameter in meters.
        #[http("ApertureDiameter", method = Get)]
        pub async fn aperture_diameter(&self) -> Result<f64>;

        /// Whether the mount is stopped at its home position.
        #[http("AtHome", method = Get)]
        pub async fn at_home(&self) -> Result<bool>;

        /// Whether the mount is parked.
        #[http("AtPark", method = Get)]
        pub async fn at_park(&self) -> Result<bool>;

        /// Rate ranges [`move_axis`](Self::move_axis) accepts for the given axis, in degrees per second.
        ///
        /// Empty for drivers older than interface version 2.
        #[http("AxisRates", method = Get, policy = since 2 => EmptyList)]
        pub async fn axis_rates(
            &self,
            #[http("Axis")] axis: TelescopeAxis,
        ) -> Result<OrdinalCollection<AxisRate>>;

        /// Azimuth in degrees, North-referenced, positive East.
        #[http("Azimuth", method = Get)]
        pub async fn azimuth(&self) -> Result<f64>;

        /// Whether [`find_home`](Self::find_home) is supported.
        #[http("CanFindHome", method = Get, policy = mandatory)]
        pub async fn can_find_home(&self) -> Result<bool>;

        /// Whether [`move_axis`](Self::move_axis) is supported for the given axis.
        #[http("CanMoveAxis", method = Get, policy = since 2 => Bool(false))]
        pub async fn can_move_axis(&self, #[http("Axis")] axis: TelescopeAxis) -> Result<bool>;

        /// Whether [`park`](Self::park) is supported.
        #[http("CanPark", method = Get, policy = mandatory)]
        pub async fn can_park(&self) -> Result<bool>;

        /// Whether [`pulse_guide`](Self::pulse_guide) is supported.
        #[http("CanPulseGuide", method = Get, policy = mandatory)]
        pub async fn can_pulse_guide(&self) -> Result<bool>;

        /// Whether the declination rate can be changed.
        #[http("CanSetDeclinationRate", method = Get, policy = mandatory)]
        pub async fn can_set_declination_rate(&self) -> Result<bool>;

        /// Whether the guide rates can be changed.
        #[http("CanSetGuideRates", method = Get, policy = since 2 => Bool(false))]
        pub async fn can_set_guide_rates(&self) -> Result<bool>;

        /// Whether [`set_park`](Self::set_park) is supported.
        #[http("CanSetPark", method = Get, policy = mandatory)]
        pub async fn can_set_park(&self) -> Result<bool>;

        /// Whether the pointing state can be forced.
        #[http("CanSetPierSide", method = Get, policy = since 2 => Bool(false))]
        pub async fn can_set_pier_side(&self) -> Result<bool>;

        /// Whether the right ascension rate can be changed.
        #[http("CanSetRightAscensionRate", method = Get, policy = mandatory)]
        pub async fn can_set_right_ascension_rate(&self) -> Result<bool>;

        /// Whether tracking can be switched on and off.
        #[http("CanSetTracking", method = Get, policy = mandatory)]
        pub async fn can_set_tracking(&self) -> Result<bool>;

        /// Whether equatorial slews are supported.
        #[http("CanSlew", method = Get, policy = mandatory)]
        pub async fn can_slew(&self) -> Result<bool>;

        /// Whether synchronous alt/az slews are supported.
        #[http("CanSlewAltAz", method = Get, policy = mandatory)]
        pub async fn can_slew_alt_az(&self) -> Result<bool>;

        /// Whether asynchronous alt/az slews are supported.
        #[http("CanSlewAltAzAsync", method = Get, policy = mandatory)]
        pub async fn can_slew_alt_az_async(&self) -> Result<bool>;

        /// Whether asynchronous equatorial slews are supported.
        #[http("CanSlewAsync", method = Get, policy = mandatory)]
        pub async fn can_slew_async(&self) -> Result<bool>;

        /// Whether equatorial syncs are supported.
        #[http("CanSync", method = Get, policy = mandatory)]
        pub async fn can_sync(&self) -> Result<bool>;

        /// Whether alt/az syncs are supported.
        #[http("CanSyncAltAz", method = Get, policy = mandatory)]
        pub async fn can_sync_alt_az(&self) -> Result<bool>;

        /// Whether [`unpark`](Self::unpark) is supported.
        #[http("CanUnpark", method = Get, policy = mandatory)]
        pub async fn can_unpark(&self) -> Result<bool>;

        /// Declination in degrees.
        #[http("Declination", method = Get, policy = mandatory)]
        pub async fn declination(&self) -> Result<f64>;

        /// Declination tracking offset in arcseconds per SI second.
        #[http("DeclinationRate", method = Get, policy = mandatory)]
        pub async fn declination_rate(&self) -> Result<f64>;

        /// Sets the declination tracking offset.
        #[http("DeclinationRate", method = Set)]
        pub async fn set_declination_rate(
            &self,
            #[http("DeclinationRate")] declination_rate: f64,
        ) -> Result;

        /// Pointing state after a slew to the given coordinates.
        #[http("DestinationSideOfPier", method = Get, policy = since 2 => Unsupported)]
        pub async fn destination_side_of_pier(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        ) -> Result<PierSide>;

        /// Whether atmospheric refraction is applied to coordinates.
        #[http("DoesRefraction", method = Get)]
        pub async fn does_refraction(&self) -> Result<bool>;

        /// Enables or disables refraction correction.
        #[http("DoesRefraction", method = Set)]
        pub async fn set_does_refraction(
            &self,
            #[http("DoesRefraction")] does_refraction: bool,
        ) -> Result;

        /// Equatorial coordinate system used by the mount.
        #[http("EquatorialSystem", method = Get)]
        pub async fn equatorial_system(&self) -> Result<EquatorialCoordinateType>;

        /// Moves the mount to its home position.
        #[http("FindHome", method = Invoke, tier = Long)]
        pub async fn find_home(&self) -> Result;

        /// Focal length in meters.
        #[http("FocalLength", method = Get)]
        pub async fn focal_length(&self) -> Result<f64>;

        /// Declination guide rate in degrees per second.
        #[http("GuideRateDeclination", method = Get)]
        pub async fn guide_rate_declination(&self) -> Result<f64>;

        /// Sets the declination guide rate.
        #[http("GuideRateDeclination", method = Set)]
        pub async fn set_guide_rate_declination(
            &self,
            #[http("GuideRateDeclination")] guide_rate_declination: f64,
        ) -> Result;

        /// Right ascension guide rate in degrees per second.
        #[http("GuideRateRightAscension", method = Get)]
        pub async fn guide_rate_right_ascension(&self) -> Result<f64>;

        /// Sets the right ascension guide rate.
        #[http("GuideRateRightAscension", method = Set)]
        pub async fn set_guide_rate_right_ascension(
            &self,
            #[http("GuideRateRightAscension")] guide_rate_right_ascension: f64,
        ) -> Result;

        /// Whether a pulse guide is in progress.
        #[http("IsPulseGuiding", method = Get)]
        pub async fn is_pulse_guiding(&self) -> Result<bool>;

        /// Moves an axis at the given rate in degrees per second; 0 stops it.
        #[http("MoveAxis", method = Invoke, policy = since 2 => Unsupported)]
        pub async fn move_axis(
            &self,
            #[http("Axis")] axis: TelescopeAxis,
            #[http("Rate")] rate: f64,
        ) -> Result;

        /// Moves the mount to its park position.
        #[http("Park", method = Invoke, tier = Long)]
        pub async fn park(&self) -> Result;

        /// Moves the mount in the given direction for `duration` milliseconds.
        #[http("PulseGuide", method = Invoke)]
        pub async fn pulse_guide(
            &self,
            #[http("Direction")] direction: GuideDirection,
            #[http("Duration")] duration: i32,
        ) -> Result;

        /// Right ascension in hours.
        #[http("RightAscension", method = Get, policy = mandatory)]
        pub async fn right_ascension(&self) -> Result<f64>;

        /// Right ascension tracking offset in seconds per sidereal second.
        #[http("RightAscensionRate", method = Get, policy = mandatory)]
        pub async fn right_ascension_rate(&self) -> Result<f64>;

        /// Sets the right ascension tracking offset.
        #[http("RightAscensionRate", method = Set)]
        pub async fn set_right_ascension_rate(
            &self,
            #[http("RightAscensionRate")] right_ascension_rate: f64,
        ) -> Result;

        /// Marks the current position as the park position.
        #[http("SetPark", method = Invoke)]
        pub async fn set_park(&self) -> Result;

        /// Current pointing state.
        #[http("SideOfPier", method = Get)]
        pub async fn side_of_pier(&self) -> Result<PierSide>;

        /// Forces a pointing state, flipping the mount if needed.
        #[http("SideOfPier", method = Set, tier = Long)]
        pub async fn set_side_of_pier(&self, #[http("SideOfPier")] side_of_pier: PierSide) -> Result;

        /// Local apparent sidereal time in hours.
        #[http("SiderealTime", method = Get, policy = mandatory)]
        pub async fn sidereal_time(&self) -> Result<f64>;

        /// Site elevation in meters.
        #[http("SiteElevation", method = Get)]
        pub async fn site_elevation(&self) -> Result<f64>;

        /// Sets the site elevation.
        #[http("SiteElevation", method = Set)]
        pub async fn set_site_elevation(&self, #[http("SiteElevation")] site_elevation: f64) -> Result;

        /// Site latitude in degrees.
        #[http("SiteLatitude", method = Get)]
        pub async fn site_latitude(&self) -> Result<f64>;

        /// Sets the site latitude.
        #[http("SiteLatitude", method = Set)]
        pub async fn set_site_latitude(&self, #[http("SiteLatitude")] site_latitude: f64) -> Result;

        /// Site longitude in degrees, positive East.
        #[http("SiteLongitude", method = Get)]
        pub async fn site_longitude(&self) -> Result<f64>;

        /// Sets the site longitude.
        #[http("SiteLongitude", method = Set)]
        pub async fn set_site_longitude(&self, #[http("SiteLongitude")] site_longitude: f64) -> Result;

        /// Slews to the given alt/az coordinates and waits for completion.
        #[http("SlewToAltAz", method = Invoke, tier = Long)]
        #[deprecated(note = "Use `slew_to_alt_az_async` instead.")]
        pub async fn slew_to_alt_az(
            &self,
            #[http("Azimuth")] azimuth: f64,
            #[http("Altitude")] altitude: f64,
        ) -> Result;

        /// Starts a slew to the given alt/az coordinates.
        #[http("SlewToAltAzAsync", method = Invoke)]
        pub async fn slew_to_alt_az_async(
            &self,
            #[http("Azimuth")] azimuth: f64,
            #[http("Altitude")] altitude: f64,
        ) -> Result;

        /// Slews to the given equatorial coordinates and waits for completion.
        #[http("SlewToCoordinates", method = Invoke, tier = Long)]
        #[deprecated(note = "Use `slew_to_coordinates_async` instead.")]
        pub async fn slew_to_coordinates(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        ) -> Result;

        /// Starts a slew to the given equatorial coordinates.
        #[http("SlewToCoordinatesAsync", method = Invoke)]
        pub async fn slew_to_coordinates_async(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        ) -> Result;

        /// Slews to the target coordinates and waits for completion.
        #[http("SlewToTarget", method = Invoke, tier = Long)]
        #[deprecated(note = "Use `slew_to_target_async` instead.")]
        pub async fn slew_to_target(&self) -> Result;

        /// Starts a slew to the target coordinates.
        #[http("SlewToTargetAsync", method = Invoke)]
        pub async fn slew_to_target_async(&self) -> Result;

        /// Whether the mount is slewing.
        #[http("Slewing", method = Get)]
        pub async fn slewing(&self) -> Result<bool>;

        /// Post-slew settling time in seconds.
        #[http("SlewSettleTime", method = Get)]
        pub async fn slew_settle_time(&self) -> Result<i32>;

        /// Sets the post-slew settling time.
        #[http("SlewSettleTime", method = Set)]
        pub async fn set_slew_settle_time(
            &self,
            #[http("SlewSettleTime")] slew_settle_time: i32,
        ) -> Result;

        /// Syncs to the given alt/az coordinates.
        #[http("SyncToAltAz", method = Invoke)]
        pub async fn sync_to_alt_az(
            &self,
            #[http("Azimuth")] azimuth: f64,
            #[http("Altitude")] altitude: f64,
        ) -> Result;

        /// Syncs to the given equatorial coordinates.
        #[http("SyncToCoordinates", method = Invoke)]
        pub async fn sync_to_coordinates(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        ) -> Result;

        /// Syncs to the target coordinates.
        #[http("SyncToTarget", method = Invoke)]
        pub async fn sync_to_target(&self) -> Result;

        /// Target declination in degrees.
        #[http("TargetDeclination", method = Get)]
        pub async fn target_declination(&self) -> Result<f64>;

        /// Sets the target declination.
        #[http("TargetDeclination", method = Set)]
        pub async fn set_target_declination(
            &self,
            #[http("TargetDeclination")] target_declination: f64,
        ) -> Result;

        /// Target right ascension in hours.
        #[http("TargetRightAscension", method = Get)]
        pub async fn target_right_ascension(&self) -> Result<f64>;

        /// Sets the target right ascension.
        #[http("TargetRightAscension", method = Set)]
        pub async fn set_target_right_ascension(
            &self,
            #[http("TargetRightAscension")] target_right_ascension: f64,
        ) -> Result;

        /// Whether the mount is tracking.
        #[http("Tracking", method = Get, policy = mandatory)]
        pub async fn tracking(&self) -> Result<bool>;

        /// Switches tracking on or off.
        #[http("Tracking", method = Set)]
        pub async fn set_tracking(&self, #[http("Tracking")] tracking: bool) -> Result;

        /// Current tracking rate; sidereal for drivers older than interface version 2.
        #[http("TrackingRate", method = Get, policy = since 2 => Int(0))]
        pub async fn tracking_rate(&self) -> Result<DriveRate>;

        /// Selects a tracking rate.
        #[http("TrackingRate", method = Set, policy = since 2 => Unsupported)]
        pub async fn set_tracking_rate(&self, #[http("TrackingRate")] tracking_rate: DriveRate) -> Result;

        /// Supported tracking rates; only sidereal for drivers older than interface version 2.
        #[http("TrackingRates", method = Get, policy = since 2 => IntList(&[0]))]
        pub async fn tracking_rates(&self) -> Result<OrdinalCollection<DriveRate>>;

        /// Mount's UTC clock.
        #[http("UTCDate", method = Get, via = TimeRepr<Iso8601>)]
        pub async fn utc_date(&self) -> Result<SystemTime>;

        /// Sets the mount's UTC clock.
        #[http("UTCDate", method = Set)]
        pub async fn set_utc_date(
            &self,
            #[http("UTCDate", via = TimeRepr<Iso8601>)] utc_date: SystemTime,
        ) -> Result;

        /// Takes the mount out of the parked state.
        #[http("Unpark", method = Invoke, tier = Long)]
        pub async fn unpark(&self) -> Result;
    }
}

/// Mount geometry.
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
pub enum AlignmentMode {
    /// Altitude-azimuth.
    AltAz = 0,
    /// Equatorial, other than German.
    Polar = 1,
    /// German equatorial.
    GermanPolar = 2,
}

/// Equatorial coordinate system.
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
pub enum EquatorialCoordinateType {
    /// Custom or unknown.
    Other = 0,
    /// Topocentric.
    Topocentric = 1,
    /// J2000.
    J2000 = 2,
    /// J2050.
    J2050 = 3,
    /// B1950.
    B1950 = 4,
}

/// Pointing state of the mount.
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
pub enum PierSide {
    /// Mount on the East side of the pier, looking West.
    East = 0,
    /// Mount on the West side of the pier, looking East.
    West = 1,
    /// Unknown.
    Unknown = -1,
}

/// Standard tracking rate.
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
pub enum DriveRate {
    /// 15.041 arcseconds per second.
    Sidereal = 0,
    /// 14.685 arcseconds per second.
    Lunar = 1,
    /// 15.0 arcseconds per second.
    Solar = 2,
    /// 15.0369 arcseconds per second.
    King = 3,
}

/// Mount axis.
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
pub enum TelescopeAxis {
    /// Right ascension or azimuth.
    Primary = 0,
    /// Declination or altitude.
    Secondary = 1,
    /// Imager rotator.
    Tertiary = 2,
}

/// Range of rates an axis can be moved at, in degrees per second.
///
/// Both bounds are positive; the range applies in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AxisRate {
    /// Lower bound.
    pub minimum: f64,
    /// Upper bound.
    pub maximum: f64,
}
