use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use crate::query::ValidSearch;
use crate::schedule;

const AIRLINES: [&str; 7] = [
    "Air India",
    "IndiGo",
    "SpiceJet",
    "Vistara",
    "Go First",
    "AirAsia India",
    "Akasa Air",
];

const AIRPORT_CODES: [(&str, &str); 32] = [
    ("Delhi", "DEL"),
    ("Mumbai", "BOM"),
    ("Bangalore", "BLR"),
    ("Bengaluru", "BLR"),
    ("Kolkata", "CCU"),
    ("Chennai", "MAA"),
    ("Hyderabad", "HYD"),
    ("Pune", "PNQ"),
    ("Ahmedabad", "AMD"),
    ("Goa", "GOI"),
    ("Jaipur", "JAI"),
    ("Kochi", "COK"),
    ("Lucknow", "LKO"),
    ("Chandigarh", "IXC"),
    ("Indore", "IDR"),
    ("Bhubaneswar", "BBI"),
    ("Varanasi", "VNS"),
    ("Patna", "PAT"),
    ("Ranchi", "IXR"),
    ("Guwahati", "GAU"),
    ("Srinagar", "SXR"),
    ("Amritsar", "ATQ"),
    ("Udaipur", "UDR"),
    ("Jodhpur", "JDH"),
    ("Mangalore", "IXE"),
    ("Coimbatore", "CJB"),
    ("Nagpur", "NAG"),
    ("Trivandrum", "TRV"),
    ("Visakhapatnam", "VTZ"),
    ("Vijayawada", "VGA"),
    ("Madurai", "IXM"),
    ("Agartala", "IXA"),
];

const STOPOVER_CITIES: [&str; 4] = ["Bangalore", "Hyderabad", "Mumbai", "Delhi"];

fn airport_code(city: &str) -> String {
    AIRPORT_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(city))
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_else(|| {
            city.chars()
                .take(3)
                .collect::<String>()
                .to_ascii_uppercase()
        })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub from: String,
    pub from_code: String,
    pub to: String,
    pub to_code: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub date: NaiveDate,
    pub price: i64,
    pub seats_available: u32,
    pub class: Vec<String>,
    pub stops: u32,
    pub stop_location: Option<String>,
    pub baggage: String,
    pub refundable: bool,
}

/// Fabricate a ranked list of flight offers for a route and date. Stateless;
/// the only side effect is the caller's audit line.
pub fn generate_flights(search: &ValidSearch, rng: &mut impl Rng) -> Vec<FlightOffer> {
    let count = rng.gen_range(8..=14);
    let mut flights = Vec::with_capacity(count);

    for _ in 0..count {
        let airline = AIRLINES[rng.gen_range(0..AIRLINES.len())];
        // Operational window 05:00-23:59.
        let (hour, minute) = schedule::random_departure(rng, 5, 19);
        let duration = rng.gen_range(60..300);
        let stops = if rng.gen_bool(0.25) { 1 } else { 0 };
        let price = if stops == 0 {
            rng.gen_range(3_000..12_000)
        } else {
            rng.gen_range(2_000..8_000)
        };

        let carrier_code: String = airline
            .split_whitespace()
            .next()
            .unwrap_or(airline)
            .chars()
            .take(2)
            .collect::<String>()
            .to_ascii_uppercase();

        flights.push(FlightOffer {
            id: schedule::offer_id(rng, "FL"),
            airline: airline.to_string(),
            flight_number: format!("{carrier_code}{}", rng.gen_range(1000..10_000)),
            from: search.from.clone(),
            from_code: airport_code(&search.from),
            to: search.to.clone(),
            to_code: airport_code(&search.to),
            departure_time: schedule::format_clock(hour, minute),
            arrival_time: schedule::format_arrival(hour, minute, duration),
            duration: schedule::format_duration(duration),
            date: search.date,
            price,
            seats_available: rng.gen_range(15..95),
            class: vec!["Economy".to_string(), "Business".to_string()],
            stops,
            stop_location: if stops > 0 {
                Some(STOPOVER_CITIES[rng.gen_range(0..STOPOVER_CITIES.len())].to_string())
            } else {
                None
            },
            baggage: "15 kg check-in, 7 kg cabin".to_string(),
            refundable: rng.gen_bool(0.5),
        });
    }

    flights.sort_by_key(|f| f.price);
    flights
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
            let flights = generate_flights(&search(), &mut rng);
            assert!((8..=14).contains(&flights.len()));
            assert!(flights.windows(2).all(|w| w[0].price <= w[1].price));
        }
    }

    #[test]
    fn known_cities_map_to_iata_codes_and_unknown_ones_fall_back() {
        assert_eq!(airport_code("Mumbai"), "BOM");
        assert_eq!(airport_code("Bengaluru"), "BLR");
        assert_eq!(airport_code("Shillong"), "SHI");
    }

    #[test]
    fn every_offer_has_valid_times_and_plausible_fields() {
        let mut rng = StdRng::seed_from_u64(99);
        for flight in generate_flights(&search(), &mut rng) {
            let (h, m) = flight.departure_time.split_once(':').unwrap();
            assert!(h.parse::<u32>().unwrap() < 24);
            assert!(m.parse::<u32>().unwrap() < 60);

            assert!(flight.id.starts_with("FL"));
            assert_eq!(flight.id.len(), 11);
            assert!(flight.price >= 2_000 && flight.price < 12_000);
            assert!((15..95).contains(&flight.seats_available));
            assert!(flight.stops <= 1);
            assert_eq!(flight.stops == 1, flight.stop_location.is_some());
        }
    }

    #[test]
    fn overnight_arrivals_are_marked_next_day() {
        // Scan many generations for a rollover case and check its shape.
        let mut rng = StdRng::seed_from_u64(3);
        let mut saw_rollover = false;
        for _ in 0..50 {
            for flight in generate_flights(&search(), &mut rng) {
                if let Some((_, suffix)) = flight.arrival_time.split_once(' ') {
                    assert_eq!(suffix, "+1");
                    saw_rollover = true;
                }
            }
        }
        assert!(saw_rollover, "expected at least one overnight flight");
    }
}
