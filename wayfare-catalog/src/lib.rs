pub mod buses;
pub mod flights;
pub mod query;
pub mod schedule;
pub mod trains;

pub use buses::{generate_buses, BusOffer};
pub use flights::{generate_flights, FlightOffer};
pub use query::{validate_search, SearchQuery, ValidSearch};
pub use trains::{generate_trains, TrainOffer};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),
}
