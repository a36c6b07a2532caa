//! Synthesizing one representation of a feature from another.
//!
//! A switch can be driven as a boolean (on/off) or as a continuous value with
//! a range and a step. Two-state devices often implement only the boolean
//! form; [`ValueEmulator`] presents them through the continuous one as the
//! unit interval.

use crate::errors::Result;
use async_trait::async_trait;

/// Boolean form of a switch.
#[async_trait]
pub trait SwitchState: Send + Sync {
    /// State of switch `id`.
    async fn get_switch(&self, id: i32) -> Result<bool>;

    /// Set the state of switch `id`.
    async fn set_switch(&self, id: i32, state: bool) -> Result;
}

/// Continuous form of a switch.
#[async_trait]
pub trait SwitchValue: SwitchState {
    /// Value of switch `id`.
    async fn get_switch_value(&self, id: i32) -> Result<f64>;

    /// Set the value of switch `id`.
    async fn set_switch_value(&self, id: i32, value: f64) -> Result;

    /// Minimum value of switch `id`.
    async fn min_switch_value(&self, id: i32) -> Result<f64>;

    /// Maximum value of switch `id`.
    async fn max_switch_value(&self, id: i32) -> Result<f64>;

    /// Step between successive values of switch `id`.
    async fn switch_step(&self, id: i32) -> Result<f64>;
}

/// Decorator that falls back to the boolean form when the continuous one is unsupported.
///
/// Only an [`UnsupportedOperation`](crate::ErrorKind::UnsupportedOperation)
/// failure triggers the fallback; anything else propagates unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ValueEmulator<B>(B);

impl<B> ValueEmulator<B> {
    /// Wrap a back end.
    pub const fn new(backend: B) -> Self {
        Self(backend)
    }

    /// Unwrap the back end.
    pub fn into_inner(self) -> B {
        self.0
    }
}

// Midpoint of the unit interval; values at or above it switch on.
const ON_THRESHOLD: f64 = 0.5;

#[async_trait]
impl<B: SwitchState> SwitchState for ValueEmulator<B> {
    async fn get_switch(&self, id: i32) -> Result<bool> {
        self.0.get_switch(id).await
    }

    async fn set_switch(&self, id: i32, state: bool) -> Result {
        self.0.set_switch(id, state).await
    }
}

#[async_trait]
impl<B: SwitchValue> SwitchValue for ValueEmulator<B> {
    async fn get_switch_value(&self, id: i32) -> Result<f64> {
        match self.0.get_switch_value(id).await {
            Err(err) if err.is_unsupported() => {
                tracing::debug!(id, "emulating GetSwitchValue through GetSwitch");
                Ok(if self.0.get_switch(id).await? { 1.0 } else { 0.0 })
            }
            native => native,
        }
    }

    async fn set_switch_value(&self, id: i32, value: f64) -> Result {
        match self.0.set_switch_value(id, value).await {
            Err(err) if err.is_unsupported() => {
                tracing::debug!(id, value, "emulating SetSwitchValue through SetSwitch");
                self.0.set_switch(id, value >= ON_THRESHOLD).await
            }
            native => native,
        }
    }

    async fn min_switch_value(&self, id: i32) -> Result<f64> {
        match self.0.min_switch_value(id).await {
            Err(err) if err.is_unsupported() => Ok(0.0),
            native => native,
        }
    }

    async fn max_switch_value(&self, id: i32) -> Result<f64> {
        match self.0.max_switch_value(id).await {
            Err(err) if err.is_unsupported() => Ok(1.0),
            native => native,
        }
    }

    async fn switch_step(&self, id: i32) -> Result<f64> {
        match self.0.switch_step(id).await {
            Err(err) if err.is_unsupported() => Ok(1.0),
            native => native,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, ErrorKind, ErrorOrigin};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Two-state switch bank without any continuous accessors.
    #[derive(Debug, Default)]
    struct BoolOnly {
        states: Mutex<HashMap<i32, bool>>,
        value_failure: Option<ErrorKind>,
    }

    impl BoolOnly {
        fn fail(&self, member: &str) -> Error {
            match self.value_failure {
                Some(kind) => Error::new(kind, ErrorOrigin::Transport, format_args!("{member} broke")),
                None => Error::new(
                    ErrorKind::UnsupportedOperation,
                    ErrorOrigin::Device,
                    format_args!("{member} is not implemented"),
                ),
            }
        }
    }

    #[async_trait]
    impl SwitchState for BoolOnly {
        async fn get_switch(&self, id: i32) -> Result<bool> {
            Ok(self.states.lock().map_or(false, |states| states.get(&id).copied().unwrap_or_default()))
        }

        async fn set_switch(&self, id: i32, state: bool) -> Result {
            if let Ok(mut states) = self.states.lock() {
                _ = states.insert(id, state);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SwitchValue for BoolOnly {
        async fn get_switch_value(&self, _id: i32) -> Result<f64> {
            Err(self.fail("GetSwitchValue"))
        }

        async fn set_switch_value(&self, _id: i32, _value: f64) -> Result {
            Err(self.fail("SetSwitchValue"))
        }

        async fn min_switch_value(&self, _id: i32) -> Result<f64> {
            Err(self.fail("MinSwitchValue"))
        }

        async fn max_switch_value(&self, _id: i32) -> Result<f64> {
            Err(self.fail("MaxSwitchValue"))
        }

        async fn switch_step(&self, _id: i32) -> Result<f64> {
            Err(self.fail("SwitchStep"))
        }
    }

    #[tokio::test]
    async fn value_round_trips_through_boolean_state() -> eyre::Result<()> {
        let switch = ValueEmulator::new(BoolOnly::default());

        for (value, expected) in [(0.7, 1.0), (0.3, 0.0), (0.5, 1.0), (0.0, 0.0), (1.0, 1.0)] {
            switch.set_switch_value(2, value).await?;
            assert_eq!(switch.get_switch_value(2).await?, expected, "after setting {value}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn range_is_the_unit_interval() -> eyre::Result<()> {
        let switch = ValueEmulator::new(BoolOnly::default());

        assert_eq!(switch.min_switch_value(0).await?, 0.0);
        assert_eq!(switch.max_switch_value(0).await?, 1.0);
        assert_eq!(switch.switch_step(0).await?, 1.0);

        Ok(())
    }

    #[tokio::test]
    async fn other_failures_are_not_emulated() {
        let switch = ValueEmulator::new(BoolOnly {
            value_failure: Some(ErrorKind::DriverFailure),
            ..Default::default()
        });

        let err = switch.get_switch_value(0).await.expect_err("transport fault must propagate");
        assert_eq!(err.kind(), ErrorKind::DriverFailure);
        assert_eq!(err.origin(), ErrorOrigin::Transport);

        let err = switch.set_switch_value(0, 1.0).await.expect_err("transport fault must propagate");
        assert_eq!(err.kind(), ErrorKind::DriverFailure);
        assert!(!switch.get_switch(0).await.unwrap_or(true));

        assert!(switch.max_switch_value(0).await.is_err());
    }
}
