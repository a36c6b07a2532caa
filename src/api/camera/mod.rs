mod image_array;
pub use image_array::{ImageArray, ImageArrayRank, ImageElementType, ImagePixels};

use super::guide::GuideDirection;

use super::macros::facade;
use super::time_repr::{Fits, TimeRepr};
use crate::errors::Result;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::time::SystemTime;

facade! {
    /// Camera facade.
    ///
    /// Exposure control members use the long timeout tier; completion is
    /// observed by polling [`image_ready`](Self::image_ready) or
    /// [`camera_state`](Self::camera_state).
    pub struct Camera {
        /// Aborts the current exposure, if any, and returns the camera to Idle state.
        #[http("AbortExposure", method = Invoke, tier = Long, policy = mandatory)]
        pub async fn abort_exposure(&self) -> Result;

        /// X offset of the Bayer matrix, as defined in `SensorType`.
        #[http("BayerOffsetX", method = Get, policy = since 2 => Unsupported)]
        pub async fn bayer_offset_x(&self) -> Result<i32>;

        /// Y offset of the Bayer matrix, as defined in `SensorType`.
        #[http("BayerOffsetY", method = Get, policy = since 2 => Unsupported)]
        pub async fn bayer_offset_y(&self) -> Result<i32>;

        /// Binning factor for the X axis.
        #[http("BinX", method = Get, policy = mandatory)]
        pub async fn bin_x(&self) -> Result<i32>;

        /// Sets the binning factor for the X axis.
        #[http("BinX", method = Set, policy = mandatory)]
        pub async fn set_bin_x(&self, #[http("BinX")] bin_x: i32) -> Result;

        /// Binning factor for the Y axis.
        #[http("BinY", method = Get, policy = mandatory)]
        pub async fn bin_y(&self) -> Result<i32>;

        /// Sets the binning factor for the Y axis.
        #[http("BinY", method = Set, policy = mandatory)]
        pub async fn set_bin_y(&self, #[http("BinY")] bin_y: i32) -> Result;

        /// Current camera operational state.
        #[http("CameraState", method = Get, policy = mandatory)]
        pub async fn camera_state(&self) -> Result<CameraState>;

        /// Width of the sensor in unbinned pixels.
        #[http("CameraXSize", method = Get, policy = mandatory)]
        pub async fn camera_x_size(&self) -> Result<i32>;

        /// Height of the sensor in unbinned pixels.
        #[http("CameraYSize", method = Get, policy = mandatory)]
        pub async fn camera_y_size(&self) -> Result<i32>;

        /// Whether the camera can abort exposures.
        #[http("CanAbortExposure", method = Get, policy = mandatory)]
        pub async fn can_abort_exposure(&self) -> Result<bool>;

        /// Whether the camera supports asymmetric binning.
        #[http("CanAsymmetricBin", method = Get, policy = mandatory)]
        pub async fn can_asymmetric_bin(&self) -> Result<bool>;

        /// Whether the camera has a fast readout mode.
        ///
        /// Reports `false` for drivers older than interface version 2.
        #[http("CanFastReadout", method = Get, policy = since 2 => Bool(false))]
        pub async fn can_fast_readout(&self) -> Result<bool>;

        /// Whether the cooler power setting can be read.
        #[http("CanGetCoolerPower", method = Get, policy = mandatory)]
        pub async fn can_get_cooler_power(&self) -> Result<bool>;

        /// Whether the camera supports pulse guiding.
        #[http("CanPulseGuide", method = Get, policy = mandatory)]
        pub async fn can_pulse_guide(&self) -> Result<bool>;

        /// Whether the cooler setpoint can be changed.
        #[http("CanSetCCDTemperature", method = Get, policy = mandatory)]
        pub async fn can_set_ccd_temperature(&self) -> Result<bool>;

        /// Whether an exposure in progress can be stopped.
        #[http("CanStopExposure", method = Get, policy = mandatory)]
        pub async fn can_stop_exposure(&self) -> Result<bool>;

        /// Current sensor temperature in degrees Celsius.
        #[http("CCDTemperature", method = Get)]
        pub async fn ccd_temperature(&self) -> Result<f64>;

        /// Current cooler on/off state.
        #[http("CoolerOn", method = Get)]
        pub async fn cooler_on(&self) -> Result<bool>;

        /// Turns the cooler on or off.
        #[http("CoolerOn", method = Set)]
        pub async fn set_cooler_on(&self, #[http("CoolerOn")] cooler_on: bool) -> Result;

        /// Present cooler power level, in percent.
        #[http("CoolerPower", method = Get)]
        pub async fn cooler_power(&self) -> Result<f64>;

        /// Gain of the camera in photoelectrons per A/D unit.
        #[http("ElectronsPerADU", method = Get)]
        pub async fn electrons_per_adu(&self) -> Result<f64>;

        /// Maximum exposure time supported by [`start_exposure`](Self::start_exposure).
        #[http("ExposureMax", method = Get, policy = since 2 => Unsupported)]
        pub async fn exposure_max(&self) -> Result<f64>;

        /// Minimum exposure time supported by [`start_exposure`](Self::start_exposure).
        #[http("ExposureMin", method = Get, policy = since 2 => Unsupported)]
        pub async fn exposure_min(&self) -> Result<f64>;

        /// Smallest increment in exposure time.
        #[http("ExposureResolution", method = Get, policy = since 2 => Unsupported)]
        pub async fn exposure_resolution(&self) -> Result<f64>;

        /// Whether fast readout mode is enabled.
        #[http("FastReadout", method = Get, policy = since 2 => Unsupported)]
        pub async fn fast_readout(&self) -> Result<bool>;

        /// Enables or disables fast readout mode.
        #[http("FastReadout", method = Set, policy = since 2 => Unsupported)]
        pub async fn set_fast_readout(&self, #[http("FastReadout")] fast_readout: bool) -> Result;

        /// Full well capacity in electrons at the current settings.
        #[http("FullWellCapacity", method = Get)]
        pub async fn full_well_capacity(&self) -> Result<f64>;

        /// Gain value, or an index into [`gains`](Self::gains).
        #[http("Gain", method = Get, policy = since 2 => Unsupported)]
        pub async fn gain(&self) -> Result<i32>;

        /// Sets the gain value or index.
        #[http("Gain", method = Set, policy = since 2 => Unsupported)]
        pub async fn set_gain(&self, #[http("Gain")] gain: i32) -> Result;

        /// Maximum gain value.
        #[http("GainMax", method = Get, policy = since 2 => Unsupported)]
        pub async fn gain_max(&self) -> Result<i32>;

        /// Minimum gain value.
        #[http("GainMin", method = Get, policy = since 2 => Unsupported)]
        pub async fn gain_min(&self) -> Result<i32>;

        /// Gain names supported by the camera.
        #[http("Gains", method = Get, policy = since 2 => Unsupported)]
        pub async fn gains(&self) -> Result<Vec<String>>;

        /// Whether the camera has a mechanical shutter.
        #[http("HasShutter", method = Get, policy = mandatory)]
        pub async fn has_shutter(&self) -> Result<bool>;

        /// Heat sink temperature in degrees Celsius.
        #[http("HeatSinkTemperature", method = Get)]
        pub async fn heat_sink_temperature(&self) -> Result<f64>;

        /// Pixel values from the last exposure.
        ///
        /// Remote cameras are read with the transfer mode and compression
        /// chosen in [`SessionOptions`](crate::SessionOptions). With
        /// [`ImageBytes`](crate::ImageTransferMode::ImageBytes) the server may
        /// still answer in JSON; both forms are accepted.
        #[http("ImageArray", method = Get, tier = Long, policy = mandatory)]
        pub async fn image_array(&self) -> Result<ImageArray>;

        /// Whether an image is ready to be downloaded.
        #[http("ImageReady", method = Get, policy = mandatory)]
        pub async fn image_ready(&self) -> Result<bool>;

        /// Whether a pulse guide is in progress.
        #[http("IsPulseGuiding", method = Get)]
        pub async fn is_pulse_guiding(&self) -> Result<bool>;

        /// Actual duration of the last exposure in seconds.
        #[http("LastExposureDuration", method = Get)]
        pub async fn last_exposure_duration(&self) -> Result<f64>;

        /// Start time of the last exposure.
        #[http("LastExposureStartTime", method = Get, via = TimeRepr<Fits>)]
        pub async fn last_exposure_start_time(&self) -> Result<SystemTime>;

        /// Maximum ADU value the camera can produce.
        #[http("MaxADU", method = Get, policy = mandatory)]
        pub async fn max_adu(&self) -> Result<i32>;

        /// Maximum binning for the X axis.
        #[http("MaxBinX", method = Get, policy = mandatory)]
        pub async fn max_bin_x(&self) -> Result<i32>;

        /// Maximum binning for the Y axis.
        #[http("MaxBinY", method = Get, policy = mandatory)]
        pub async fn max_bin_y(&self) -> Result<i32>;

        /// Subframe width in binned pixels.
        #[http("NumX", method = Get, policy = mandatory)]
        pub async fn num_x(&self) -> Result<i32>;

        /// Sets the subframe width.
        #[http("NumX", method = Set, policy = mandatory)]
        pub async fn set_num_x(&self, #[http("NumX")] num_x: i32) -> Result;

        /// Subframe height in binned pixels.
        #[http("NumY", method = Get, policy = mandatory)]
        pub async fn num_y(&self) -> Result<i32>;

        /// Sets the subframe height.
        #[http("NumY", method = Set, policy = mandatory)]
        pub async fn set_num_y(&self, #[http("NumY")] num_y: i32) -> Result;

        /// Offset value, or an index into [`offsets`](Self::offsets).
        #[http("Offset", method = Get, policy = since 3 => Unsupported)]
        pub async fn offset(&self) -> Result<i32>;

        /// Sets the offset value or index.
        #[http("Offset", method = Set, policy = since 3 => Unsupported)]
        pub async fn set_offset(&self, #[http("Offset")] offset: i32) -> Result;

        /// Maximum offset value.
        #[http("OffsetMax", method = Get, policy = since 3 => Unsupported)]
        pub async fn offset_max(&self) -> Result<i32>;

        /// Minimum offset value.
        #[http("OffsetMin", method = Get, policy = since 3 => Unsupported)]
        pub async fn offset_min(&self) -> Result<i32>;

        /// Offset names supported by the camera.
        #[http("Offsets", method = Get, policy = since 3 => Unsupported)]
        pub async fn offsets(&self) -> Result<Vec<String>>;

        /// Completion of the current operation, 0 to 100.
        #[http("PercentCompleted", method = Get, policy = since 2 => Unsupported)]
        pub async fn percent_completed(&self) -> Result<i32>;

        /// Pixel width in microns.
        #[http("PixelSizeX", method = Get, policy = mandatory)]
        pub async fn pixel_size_x(&self) -> Result<f64>;

        /// Pixel height in microns.
        #[http("PixelSizeY", method = Get, policy = mandatory)]
        pub async fn pixel_size_y(&self) -> Result<f64>;

        /// Moves the mount in the given direction for `duration` milliseconds.
        #[http("PulseGuide", method = Invoke)]
        pub async fn pulse_guide(
            &self,
            #[http("Direction")] direction: GuideDirection,
            #[http("Duration")] duration: i32,
        ) -> Result;

        /// Index into [`readout_modes`](Self::readout_modes).
        ///
        /// Drivers older than interface version 2 have a single mode, 0.
        #[http("ReadoutMode", method = Get, policy = since 2 => Int(0))]
        pub async fn readout_mode(&self) -> Result<i32>;

        /// Selects a readout mode.
        #[http("ReadoutMode", method = Set, policy = since 2 => Unsupported)]
        pub async fn set_readout_mode(&self, #[http("ReadoutMode")] readout_mode: i32) -> Result;

        /// Names of the available readout modes.
        #[http("ReadoutModes", method = Get, policy = since 2 => Unsupported)]
        pub async fn readout_modes(&self) -> Result<Vec<String>>;

        /// Name of the sensor, empty for drivers older than interface version 2.
        #[http("SensorName", method = Get, policy = since 2 => Str(""))]
        pub async fn sensor_name(&self) -> Result<String>;

        /// Sensor colour layout.
        #[http("SensorType", method = Get, policy = since 2 => Unsupported)]
        pub async fn sensor_type(&self) -> Result<SensorType>;

        /// Cooler setpoint in degrees Celsius.
        #[http("SetCCDTemperature", method = Get)]
        pub async fn set_ccd_temperature(&self) -> Result<f64>;

        /// Changes the cooler setpoint.
        #[http("SetCCDTemperature", method = Set)]
        pub async fn set_set_ccd_temperature(
            &self,
            #[http("SetCCDTemperature")] set_ccd_temperature: f64,
        ) -> Result;

        /// Starts an exposure.
        ///
        /// Returns once the exposure has started; poll [`image_ready`](Self::image_ready).
        #[http("StartExposure", method = Invoke, tier = Long, policy = mandatory)]
        pub async fn start_exposure(
            &self,
            #[http("Duration")] duration: f64,
            #[http("Light")] light: bool,
        ) -> Result;

        /// Subframe X start position in binned pixels.
        #[http("StartX", method = Get, policy = mandatory)]
        pub async fn start_x(&self) -> Result<i32>;

        /// Sets the subframe X start position.
        #[http("StartX", method = Set, policy = mandatory)]
        pub async fn set_start_x(&self, #[http("StartX")] start_x: i32) -> Result;

        /// Subframe Y start position in binned pixels.
        #[http("StartY", method = Get, policy = mandatory)]
        pub async fn start_y(&self) -> Result<i32>;

        /// Sets the subframe Y start position.
        #[http("StartY", method = Set, policy = mandatory)]
        pub async fn set_start_y(&self, #[http("StartY")] start_y: i32) -> Result;

        /// Stops the current exposure and starts readout.
        #[http("StopExposure", method = Invoke, tier = Long)]
        pub async fn stop_exposure(&self) -> Result;

        /// Sub exposure duration in seconds.
        #[http("SubExposureDuration", method = Get, policy = since 3 => Unsupported)]
        pub async fn sub_exposure_duration(&self) -> Result<f64>;

        /// Sets the sub exposure duration.
        #[http("SubExposureDuration", method = Set, policy = since 3 => Unsupported)]
        pub async fn set_sub_exposure_duration(
            &self,
            #[http("SubExposureDuration")] sub_exposure_duration: f64,
        ) -> Result;
    }
}

/// Camera state.
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
pub enum CameraState {
    /// Idle, available to start an exposure.
    Idle = 0,
    /// Waiting for shutter, trigger or filter wheel.
    Waiting = 1,
    /// Exposing.
    Exposing = 2,
    /// Reading out the sensor.
    Reading = 3,
    /// Downloading data to the host.
    Download = 4,
    /// Error serious enough to prevent further operations.
    Error = 5,
}

/// Sensor colour layout.
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
#[allow(clippy::upper_case_acronyms)]
pub enum SensorType {
    /// Single-plane monochrome.
    Monochrome = 0,
    /// Multiple-plane colour.
    Color = 1,
    /// Bayer RGGB.
    RGGB = 2,
    /// Bayer CMYG.
    CMYG = 3,
    /// Bayer CMYG2.
    CMYG2 = 4,
    /// Bayer LRGB.
    LRGB = 5,
}
