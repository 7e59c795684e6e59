use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::PlannerError;

#[derive(Debug, Clone, Deserialize)]
pub struct TripPlanRequest {
    pub current_location: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub budget_inr: i64,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl TripPlanRequest {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.current_location.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(PlannerError::Validation(
                "Origin and destination are required".into(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(PlannerError::Validation(
                "End date must not be before start date".into(),
            ));
        }
        if self.travelers < 1 || self.travelers > 9 {
            return Err(PlannerError::Validation(
                "Travelers must be between 1 and 9".into(),
            ));
        }
        if self.budget_inr <= 0 {
            return Err(PlannerError::Validation("Budget must be positive".into()));
        }
        Ok(())
    }

    /// Trip length in days, inclusive of both endpoints.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepCategory {
    Transport,
    Accommodation,
    Activity,
    Food,
    Sightseeing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub id: String,
    pub day: u32,
    pub time: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub duration: String,
    pub category: StepCategory,
    pub is_bookable: bool,
    pub estimated_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub title: String,
    pub reason: String,
    pub steps: Vec<PlanStep>,
}
