pub mod booking;
pub mod qr;
pub mod repository;
pub mod share;
pub mod validate;

pub use booking::{
    generate_booking_reference, Booking, BookingStatus, BookingType, PaymentStatus, TripSegment,
};
pub use qr::{QrSigner, ScannedTicket, TicketClaim};
pub use repository::{BookingStore, RepoError, ShareStore};
pub use share::{AccessLevel, ShareStatus, TripShare};
pub use validate::{
    check_booking_policy, validate_booking, BookingDraft, BookingPolicy, ValidBooking,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or out-of-range input. The message is safe to show to the caller.
    #[error("{0}")]
    Validation(String),
    /// Well-formed input that violates a business rule (past-dated departure etc.).
    #[error("{0}")]
    Policy(String),
    #[error("Booking not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    /// The scanned payload was not decodable as a ticket.
    #[error("Invalid QR code format")]
    MalformedTicket,
    /// Signature verification failed. Deliberately does not say which check failed.
    #[error("Ticket verification failed")]
    SignatureMismatch,
    #[error("Internal service error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
