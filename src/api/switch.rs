use super::macros::facade;
use crate::emulation::{SwitchState, SwitchValue, ValueEmulator};
use crate::errors::Result;
use async_trait::async_trait;

facade! {
    /// Switch facade.
    ///
    /// Switches are numbered from 0 to `MaxSwitch - 1`. The continuous value
    /// members work on every switch: if the back end only implements the
    /// boolean form, they present it as the unit interval (see
    /// [`ValueEmulator`]).
    pub struct Switch {
        /// Number of switches managed by this device.
        #[http("MaxSwitch", method = Get, policy = mandatory)]
        pub async fn max_switch(&self) -> Result<i32>;

        /// Whether the given switch can operate asynchronously.
        #[http("CanAsync", method = Get, policy = since 3 => Bool(false))]
        pub async fn can_async(&self, #[http("Id")] id: i32) -> Result<bool>;

        /// Cancels an asynchronous state change in progress.
        #[http("CancelAsync", method = Invoke, policy = since 3 => Unsupported)]
        pub async fn cancel_async(&self, #[http("Id")] id: i32) -> Result;

        /// Whether the given switch can be written to.
        ///
        /// Drivers older than interface version 2 only have writable switches.
        #[http("CanWrite", method = Get, policy = since 2 => Bool(true))]
        pub async fn can_write(&self, #[http("Id")] id: i32) -> Result<bool>;

        /// State of the given switch.
        #[http("GetSwitch", method = Get, policy = mandatory)]
        pub async fn get_switch(&self, #[http("Id")] id: i32) -> Result<bool>;

        /// Description of the given switch, empty for drivers older than interface version 2.
        #[http("GetSwitchDescription", method = Get, policy = since 2 => Str(""))]
        pub async fn get_switch_description(&self, #[http("Id")] id: i32) -> Result<String>;

        /// Name of the given switch.
        #[http("GetSwitchName", method = Get, policy = mandatory)]
        pub async fn get_switch_name(&self, #[http("Id")] id: i32) -> Result<String>;

        #[http("GetSwitchValue", method = Get, policy = since 2 => Unsupported)]
        async fn native_get_switch_value(&self, #[http("Id")] id: i32) -> Result<f64>;

        #[http("MaxSwitchValue", method = Get, policy = since 2 => Unsupported)]
        async fn native_max_switch_value(&self, #[http("Id")] id: i32) -> Result<f64>;

        #[http("MinSwitchValue", method = Get, policy = since 2 => Unsupported)]
        async fn native_min_switch_value(&self, #[http("Id")] id: i32) -> Result<f64>;

        /// Starts changing the state of the given switch.
        #[http("SetAsync", method = Invoke, policy = since 3 => Unsupported)]
        pub async fn set_async(
            &self,
            #[http("Id")] id: i32,
            #[http("State")] state: bool,
        ) -> Result;

        /// Starts changing the value of the given switch.
        #[http("SetAsyncValue", method = Invoke, policy = since 3 => Unsupported)]
        pub async fn set_async_value(
            &self,
            #[http("Id")] id: i32,
            #[http("Value")] value: f64,
        ) -> Result;

        /// Sets the state of the given switch.
        #[http("SetSwitch", method = Invoke, policy = mandatory)]
        pub async fn set_switch(
            &self,
            #[http("Id")] id: i32,
            #[http("State")] state: bool,
        ) -> Result;

        /// Renames the given switch.
        #[http("SetSwitchName", method = Invoke)]
        pub async fn set_switch_name(
            &self,
            #[http("Id")] id: i32,
            #[http("Name")] name: String,
        ) -> Result;

        #[http("SetSwitchValue", method = Invoke, policy = since 2 => Unsupported)]
        async fn native_set_switch_value(
            &self,
            #[http("Id")] id: i32,
            #[http("Value")] value: f64,
        ) -> Result;

        /// Whether the last asynchronous change of the given switch has finished.
        #[http("StateChangeComplete", method = Get, policy = since 3 => Unsupported)]
        pub async fn state_change_complete(&self, #[http("Id")] id: i32) -> Result<bool>;

        #[http("SwitchStep", method = Get, policy = since 2 => Unsupported)]
        async fn native_switch_step(&self, #[http("Id")] id: i32) -> Result<f64>;
    }
}

/// The switch's own members, without emulation.
struct Native<'switch>(&'switch Switch);

#[async_trait]
impl SwitchState for Native<'_> {
    async fn get_switch(&self, id: i32) -> Result<bool> {
        self.0.get_switch(id).await
    }

    async fn set_switch(&self, id: i32, state: bool) -> Result {
        self.0.set_switch(id, state).await
    }
}

#[async_trait]
impl SwitchValue for Native<'_> {
    async fn get_switch_value(&self, id: i32) -> Result<f64> {
        self.0.native_get_switch_value(id).await
    }

    async fn set_switch_value(&self, id: i32, value: f64) -> Result {
        self.0.native_set_switch_value(id, value).await
    }

    async fn min_switch_value(&self, id: i32) -> Result<f64> {
        self.0.native_min_switch_value(id).await
    }

    async fn max_switch_value(&self, id: i32) -> Result<f64> {
        self.0.native_max_switch_value(id).await
    }

    async fn switch_step(&self, id: i32) -> Result<f64> {
        self.0.native_switch_step(id).await
    }
}

impl Switch {
    fn emulated(&self) -> ValueEmulator<Native<'_>> {
        ValueEmulator::new(Native(self))
    }

    /// Value of the given switch, between [`min_switch_value`](Self::min_switch_value) and [`max_switch_value`](Self::max_switch_value).
    pub async fn get_switch_value(&self, id: i32) -> Result<f64> {
        self.emulated().get_switch_value(id).await
    }

    /// Sets the value of the given switch.
    pub async fn set_switch_value(&self, id: i32, value: f64) -> Result {
        self.emulated().set_switch_value(id, value).await
    }

    /// Minimum value of the given switch.
    pub async fn min_switch_value(&self, id: i32) -> Result<f64> {
        self.emulated().min_switch_value(id).await
    }

    /// Maximum value of the given switch.
    pub async fn max_switch_value(&self, id: i32) -> Result<f64> {
        self.emulated().max_switch_value(id).await
    }

    /// Step between successive values of the given switch.
    pub async fn switch_step(&self, id: i32) -> Result<f64> {
        self.emulated().switch_step(id).await
    }
}
