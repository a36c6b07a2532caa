use super::macros::facade;
use crate::errors::Result;

facade! {
    /// Rotator facade.
    ///
    /// Angles are in degrees. Interface version 3 separated the sky position
    /// (which can be synced) from the mechanical one; older drivers only have
    /// the former.
    pub struct Rotator {
        /// Whether the direction of rotation can be reversed.
        #[http("CanReverse", method = Get, policy = mandatory)]
        pub async fn can_reverse(&self) -> Result<bool>;

        /// Stops any motion in progress.
        #[http("Halt", method = Invoke)]
        pub async fn halt(&self) -> Result;

        /// Whether the rotator is moving.
        #[http("IsMoving", method = Get, policy = mandatory)]
        pub async fn is_moving(&self) -> Result<bool>;

        /// Raw mechanical position.
        #[http("MechanicalPosition", method = Get, policy = since 3 => Unsupported)]
        pub async fn mechanical_position(&self) -> Result<f64>;

        /// Starts a relative move.
        #[http("Move", method = Invoke, policy = mandatory)]
        pub async fn move_(&self, #[http("Position")] position: f64) -> Result;

        /// Starts a move to the given sky position.
        #[http("MoveAbsolute", method = Invoke, policy = mandatory)]
        pub async fn move_absolute(&self, #[http("Position")] position: f64) -> Result;

        /// Starts a move to the given mechanical position.
        #[http("MoveMechanical", method = Invoke, policy = since 3 => Unsupported)]
        pub async fn move_mechanical(&self, #[http("Position")] position: f64) -> Result;

        /// Current sky position.
        #[http("Position", method = Get, policy = mandatory)]
        pub async fn position(&self) -> Result<f64>;

        /// Whether the direction of rotation is reversed.
        #[http("Reverse", method = Get)]
        pub async fn reverse(&self) -> Result<bool>;

        /// Reverses the direction of rotation.
        #[http("Reverse", method = Set)]
        pub async fn set_reverse(&self, #[http("Reverse")] reverse: bool) -> Result;

        /// Minimum step size.
        #[http("StepSize", method = Get)]
        pub async fn step_size(&self) -> Result<f64>;

        /// Syncs the sky position to the given angle without moving.
        #[http("Sync", method = Invoke, policy = since 3 => Unsupported)]
        pub async fn sync(&self, #[http("Position")] position: f64) -> Result;

        /// Destination of the current move.
        #[http("TargetPosition", method = Get, policy = mandatory)]
        pub async fn target_position(&self) -> Result<f64>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DeviceClient, DeviceType};
    use crate::errors::ErrorKind;
    use crate::test::MockDriver;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn version_1_rotators_can_reverse() -> eyre::Result<()> {
        let driver = Arc::new(
            MockDriver::with_version(1)
                .with("CanReverse", true)
                .with("Reverse", false),
        );
        let rotator = Rotator::try_from(DeviceClient::local(
            DeviceType::Rotator,
            Arc::<MockDriver>::clone(&driver),
        ))?;

        assert!(rotator.can_reverse().await?);
        rotator.set_reverse(true).await?;
        assert!(rotator.reverse().await?);
        assert_eq!(driver.value("Reverse"), Some(json!(true)));

        let err = rotator
            .mechanical_position()
            .await
            .expect_err("introduced in version 3");
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        Ok(())
    }
}
