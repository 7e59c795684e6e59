use chrono::NaiveDate;
use serde::Deserialize;

use crate::CatalogError;

fn default_passengers() -> u32 {
    1
}

/// Raw catalog search body: `{ from, to, date, passengers? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub from: String,
    pub to: String,
    pub date: String,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
}

#[derive(Debug, Clone)]
pub struct ValidSearch {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub passengers: u32,
}

pub fn validate_search(query: SearchQuery) -> Result<ValidSearch, CatalogError> {
    let from = query.from.trim().to_string();
    if from.len() < 2 || from.len() > 100 {
        return Err(CatalogError::Validation(
            "Origin must be between 2 and 100 characters".into(),
        ));
    }

    let to = query.to.trim().to_string();
    if to.len() < 2 || to.len() > 100 {
        return Err(CatalogError::Validation(
            "Destination must be between 2 and 100 characters".into(),
        ));
    }

    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d")
        .map_err(|_| CatalogError::Validation("Invalid date".into()))?;

    if query.passengers < 1 || query.passengers > 9 {
        return Err(CatalogError::Validation(
            "Passengers must be between 1 and 9".into(),
        ));
    }

    Ok(ValidSearch {
        from,
        to,
        date,
        passengers: query.passengers,
    })
}
