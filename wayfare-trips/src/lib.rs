pub mod checkout;
pub mod group;
pub mod shares;
pub mod timeline;

pub use checkout::assemble_trip;
pub use group::{group_bookings, TripGroup};
pub use shares::check_share_request;
pub use timeline::{current_segment, layovers, Layover};

#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Policy(String),
    #[error("{0}")]
    Internal(String),
}
