use super::macros::facade;
use crate::errors::Result;

facade! {
    /// Focuser facade.
    pub struct Focuser {
        /// Whether the focuser reports absolute positions.
        #[http("Absolute", method = Get, policy = mandatory)]
        pub async fn absolute(&self) -> Result<bool>;

        /// Stops any motion in progress.
        #[http("Halt", method = Invoke)]
        pub async fn halt(&self) -> Result;

        /// Whether the focuser is moving.
        #[http("IsMoving", method = Get, policy = mandatory)]
        pub async fn is_moving(&self) -> Result<bool>;

        /// Largest step count a single [`move_`](Self::move_) accepts.
        #[http("MaxIncrement", method = Get, policy = mandatory)]
        pub async fn max_increment(&self) -> Result<i32>;

        /// Maximum position, in steps.
        #[http("MaxStep", method = Get, policy = mandatory)]
        pub async fn max_step(&self) -> Result<i32>;

        /// Starts moving to the given position, or by the given number of
        /// steps for relative focusers.
        #[http("Move", method = Invoke)]
        pub async fn move_(&self, #[http("Position")] position: i32) -> Result;

        /// Current position, in steps. Unsupported on relative focusers.
        #[http("Position", method = Get)]
        pub async fn position(&self) -> Result<i32>;

        /// Step size in microns.
        #[http("StepSize", method = Get)]
        pub async fn step_size(&self) -> Result<f64>;

        /// Whether temperature compensation is on.
        #[http("TempComp", method = Get, policy = mandatory)]
        pub async fn temp_comp(&self) -> Result<bool>;

        /// Switches temperature compensation on or off.
        #[http("TempComp", method = Set)]
        pub async fn set_temp_comp(&self, #[http("TempComp")] temp_comp: bool) -> Result;

        /// Whether temperature compensation is available.
        #[http("TempCompAvailable", method = Get, policy = mandatory)]
        pub async fn temp_comp_available(&self) -> Result<bool>;

        /// Ambient temperature in degrees Celsius.
        #[http("Temperature", method = Get)]
        pub async fn temperature(&self) -> Result<f64>;
    }
}
