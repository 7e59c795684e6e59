use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use crate::query::ValidSearch;
use crate::schedule;

const TRAIN_NAMES: [&str; 16] = [
    "Rajdhani Express",
    "Shatabdi Express",
    "Duronto Express",
    "Garib Rath",
    "Humsafar Express",
    "Tejas Express",
    "Vande Bharat",
    "Double Decker",
    "Jan Shatabdi",
    "Sampark Kranti",
    "Purushottam Express",
    "Karnataka Express",
    "Chennai Express",
    "Mumbai Rajdhani",
    "Delhi Duronto",
    "Kolkata Mail",
];

/// Berth classes with their fare multipliers over the sleeper base.
const CLASSES: [(&str, f64); 4] = [("SL", 1.0), ("3A", 1.8), ("2A", 2.5), ("1A", 4.0)];

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const QUOTAS: [&str; 3] = ["General", "Tatkal", "Ladies"];
const FACILITIES: [&str; 3] = ["Pantry Car", "Charging Point", "WiFi"];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SeatAvailability {
    Available,
    #[serde(rename = "RAC")]
    Rac,
    Waitlist,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFare {
    pub price: i64,
    pub available: u32,
    pub status: SeatAvailability,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainOffer {
    pub id: String,
    pub name: String,
    pub train_number: String,
    pub from: String,
    pub to: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub date: NaiveDate,
    pub classes: HashMap<String, ClassFare>,
    pub runs_on: Vec<String>,
    pub platform: u32,
    pub quota: Vec<String>,
    pub facilities: Vec<String>,
}

impl TrainOffer {
    /// Cheapest berth fare; trains rank by their sleeper class.
    pub fn sleeper_fare(&self) -> i64 {
        self.classes.get("SL").map(|c| c.price).unwrap_or(i64::MAX)
    }
}

pub fn generate_trains(search: &ValidSearch, rng: &mut impl Rng) -> Vec<TrainOffer> {
    let count = rng.gen_range(6..=13);
    let mut trains = Vec::with_capacity(count);

    for _ in 0..count {
        let name = TRAIN_NAMES[rng.gen_range(0..TRAIN_NAMES.len())];
        // Operational window 04:00 through 01:59 next day, wrapped.
        let (hour, minute) = schedule::random_departure(rng, 4, 22);
        let duration = rng.gen_range(240..960);
        let base_price: i64 = rng.gen_range(400..1_600);

        let mut classes = HashMap::with_capacity(CLASSES.len());
        for (class, multiplier) in CLASSES {
            let available = rng.gen_range(10..160);
            let status = if available > 50 {
                SeatAvailability::Available
            } else if available > 10 {
                SeatAvailability::Rac
            } else {
                SeatAvailability::Waitlist
            };
            classes.insert(
                class.to_string(),
                ClassFare {
                    price: (base_price as f64 * multiplier) as i64,
                    available,
                    status,
                },
            );
        }

        trains.push(TrainOffer {
            id: schedule::offer_id(rng, "TR"),
            name: name.to_string(),
            train_number: rng.gen_range(10_000..90_000).to_string(),
            from: search.from.clone(),
            to: search.to.clone(),
            departure_time: schedule::format_clock(hour, minute),
            arrival_time: schedule::format_arrival(hour, minute, duration),
            duration: schedule::format_duration(duration),
            date: search.date,
            classes,
            runs_on: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
            platform: rng.gen_range(1..9),
            quota: QUOTAS.iter().map(|q| q.to_string()).collect(),
            facilities: FACILITIES
                .iter()
                .filter(|_| rng.gen_bool(0.6))
                .map(|f| f.to_string())
                .collect(),
        });
    }

    trains.sort_by_key(|t| t.sleeper_fare());
    trains
}
