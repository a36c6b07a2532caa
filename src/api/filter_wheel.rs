use super::macros::facade;
use crate::errors::Result;

facade! {
    /// Filter wheel facade.
    ///
    /// Slots are numbered from 0. A position of -1 means the wheel is moving.
    pub struct FilterWheel {
        /// Focus offset of each filter, in focuser steps.
        #[http("FocusOffsets", method = Get, policy = mandatory)]
        pub async fn focus_offsets(&self) -> Result<Vec<i32>>;

        /// Name of each filter.
        #[http("Names", method = Get, policy = mandatory)]
        pub async fn names(&self) -> Result<Vec<String>>;

        /// Current slot, or -1 while moving.
        #[http("Position", method = Get, policy = mandatory)]
        pub async fn position(&self) -> Result<i32>;

        /// Starts moving to the given slot.
        #[http("Position", method = Set, policy = mandatory)]
        pub async fn set_position(&self, #[http("Position")] position: i32) -> Result;
    }
}
