use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use crate::query::ValidSearch;
use crate::schedule;

const OPERATORS: [&str; 15] = [
    "RedBus",
    "VRL Travels",
    "SRS Travels",
    "Orange Travels",
    "Parveen Travels",
    "Raj Travels",
    "KPN Travels",
    "Sharma Travels",
    "National Travels",
    "KSRTC",
    "MSRTC",
    "TSRTC",
    "IntrCity SmartBus",
    "Zingbus",
    "Abhibus",
];

const BUS_TYPES: [&str; 10] = [
    "AC Sleeper",
    "Non-AC Sleeper",
    "AC Seater",
    "Volvo AC",
    "Multi-Axle",
    "Semi-Sleeper",
    "Volvo Multi-Axle",
    "Scania AC",
    "Mercedes AC",
    "Electric AC",
];

const AMENITIES: [&str; 9] = [
    "WiFi",
    "Charging Point",
    "Water Bottle",
    "Emergency Exit",
    "Reading Light",
    "Blanket",
    "Snacks",
    "Live Tracking",
    "USB Charger",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusOffer {
    pub id: String,
    pub operator: String,
    pub bus_type: String,
    pub from: String,
    pub to: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub date: NaiveDate,
    pub price: i64,
    pub seats_available: u32,
    pub total_seats: u32,
    pub rating: String,
    pub reviews_count: u32,
    pub boarding_points: Vec<String>,
    pub dropping_points: Vec<String>,
    pub amenities: Vec<String>,
    pub cancellation_policy: String,
    pub window_seats_available: u32,
    pub refundable: bool,
}

pub fn generate_buses(search: &ValidSearch, rng: &mut impl Rng) -> Vec<BusOffer> {
    let count = rng.gen_range(10..=21);
    let mut buses = Vec::with_capacity(count);

    for _ in 0..count {
        let operator = OPERATORS[rng.gen_range(0..OPERATORS.len())];
        let bus_type = BUS_TYPES[rng.gen_range(0..BUS_TYPES.len())];
        // Operational window 05:00 through 01:59 next day, wrapped.
        let (hour, minute) = schedule::random_departure(rng, 5, 21);
        let duration = rng.gen_range(180..1_020);
        let is_ac = bus_type.contains("AC");
        let price = if is_ac {
            rng.gen_range(600..2_400)
        } else {
            rng.gen_range(300..1_200)
        };

        let total_seats = if bus_type.contains("Sleeper") { 40 } else { 50 };
        let seats_available = rng.gen_range(5..total_seats - 4);

        let boarding_count = rng.gen_range(1..=2);
        let boarding_points = [
            format!("{} Bus Stand", search.from),
            format!("{} Railway Station", search.from),
            format!("{} Airport", search.from),
        ]
        .into_iter()
        .take(boarding_count)
        .collect();

        buses.push(BusOffer {
            id: schedule::offer_id(rng, "BS"),
            operator: operator.to_string(),
            bus_type: bus_type.to_string(),
            from: search.from.clone(),
            to: search.to.clone(),
            departure_time: schedule::format_clock(hour, minute),
            arrival_time: schedule::format_arrival(hour, minute, duration),
            duration: schedule::format_duration(duration),
            date: search.date,
            price,
            seats_available,
            total_seats,
            rating: format!("{:.1}", 3.5 + rng.gen_range(0.0..1.5)),
            reviews_count: rng.gen_range(100..2_100),
            boarding_points,
            dropping_points: vec![
                format!("{} Bus Stand", search.to),
                format!("{} Railway Station", search.to),
            ],
            amenities: AMENITIES
                .iter()
                .filter(|_| rng.gen_bool(0.5))
                .map(|a| a.to_string())
                .collect(),
            cancellation_policy: "Free cancellation up to 24 hours before departure".to_string(),
            window_seats_available: seats_available * 2 / 5,
            refundable: true,
        });
    }

    buses.sort_by_key(|b| b.price);
    buses
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn search() -> ValidSearch {
        ValidSearch {
            from: "Mumbai".into(),
            to: "Goa".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            passengers: 1,
        }
    }

    #[test]
    fn offer_count_stays_in_band_and_prices_ascend() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let buses = generate_buses(&search(), &mut rng);
            assert!((10..=21).contains(&buses.len()));
            assert!(buses.windows(2).all(|w| w[0].price <= w[1].price));
        }
    }

    #[test]
    fn every_offer_has_valid_clock_times_and_duration_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for bus in generate_buses(&search(), &mut rng) {
            let (h, m) = bus.departure_time.split_once(':').unwrap();
            assert!(h.parse::<u32>().unwrap() < 24);
            assert!(m.parse::<u32>().unwrap() < 60);

            // "XhYm" with numeric halves.
            let (hours, rest) = bus.duration.split_once("h ").unwrap();
            let minutes = rest.strip_suffix('m').unwrap();
            assert!(hours.parse::<u32>().is_ok());
            assert!(minutes.parse::<u32>().unwrap() < 60);

            assert!(bus.price > 0);
        }
    }

    #[test]
    fn capacity_depends_on_sleeper_layout() {
        let mut rng = StdRng::seed_from_u64(8);
        for bus in generate_buses(&search(), &mut rng) {
            let expected = if bus.bus_type.contains("Sleeper") {
                40
            } else {
                50
            };
            assert_eq!(bus.total_seats, expected);
            assert!(bus.seats_available >= 5 && bus.seats_available < bus.total_seats);
            assert!(bus.window_seats_available <= bus.seats_available);
        }
    }

    #[test]
    fn ac_buses_price_above_the_non_ac_floor() {
        let mut rng = StdRng::seed_from_u64(21);
        for bus in generate_buses(&search(), &mut rng) {
            if bus.bus_type.contains("AC") {
                assert!((600..2_400).contains(&bus.price));
            } else {
                assert!((300..1_200).contains(&bus.price));
            }
        }
    }

    #[test]
    fn ratings_stay_in_the_review_band() {
        let mut rng = StdRng::seed_from_u64(34);
        for bus in generate_buses(&search(), &mut rng) {
            let rating: f64 = bus.rating.parse().unwrap();
            assert!((3.5..=5.0).contains(&rating));
            assert!((100..2_100).contains(&bus.reviews_count));
        }
    }
}
