use rand::Rng;

/// Minutes a departure can be scheduled on.
const MINUTE_GRID: [u32; 4] = [0, 15, 30, 45];

/// Pick a departure slot inside an operational window starting at
/// `window_start` o'clock and spanning `window_hours` hours. Hours wrap past
/// midnight so a late window still yields a valid clock time.
pub fn random_departure(rng: &mut impl Rng, window_start: u32, window_hours: u32) -> (u32, u32) {
    let hour = (window_start + rng.gen_range(0..window_hours)) % 24;
    let minute = MINUTE_GRID[rng.gen_range(0..MINUTE_GRID.len())];
    (hour, minute)
}

/// Compute the arrival clock time for a departure plus a duration, carrying
/// whole days. Returns the arrival hour/minute and how many calendar days
/// later the arrival lands.
pub fn arrival_after(dep_hour: u32, dep_minute: u32, duration_minutes: u32) -> (u32, u32, u32) {
    let total = dep_hour * 60 + dep_minute + duration_minutes;
    let days_later = total / (24 * 60);
    let remainder = total % (24 * 60);
    (remainder / 60, remainder % 60, days_later)
}

pub fn format_clock(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

/// Arrival display string: `HH:MM`, suffixed with ` +N` when the arrival is N
/// days after departure.
pub fn format_arrival(dep_hour: u32, dep_minute: u32, duration_minutes: u32) -> String {
    let (hour, minute, days_later) = arrival_after(dep_hour, dep_minute, duration_minutes);
    if days_later > 0 {
        format!("{hour:02}:{minute:02} +{days_later}")
    } else {
        format_clock(hour, minute)
    }
}

/// `XhYm` duration display, e.g. `2h 35m`.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Random uppercase base36 id with a mode prefix, e.g. `FL3K9TZQ04A`.
pub fn offer_id(rng: &mut impl Rng, prefix: &str) -> String {
    const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let body: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{prefix}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn arrival_stays_same_day_when_it_fits() {
        assert_eq!(arrival_after(8, 30, 95), (10, 5, 0));
        assert_eq!(format_arrival(8, 30, 95), "10:05");
    }

    #[test]
    fn arrival_rolls_over_midnight_with_a_plus_one() {
        // 23:45 + 2h00m = 01:45 next day.
        assert_eq!(arrival_after(23, 45, 120), (1, 45, 1));
        assert_eq!(format_arrival(23, 45, 120), "01:45 +1");
    }

    #[test]
    fn minute_overflow_carries_into_the_hour() {
        // 10:45 + 0h30m = 11:15, not 11:75 or 10:15.
        assert_eq!(arrival_after(10, 45, 30), (11, 15, 0));
    }

    #[test]
    fn long_overnight_durations_count_whole_days() {
        // 22:00 + 17h00m = 15:00 the next day.
        assert_eq!(format_arrival(22, 0, 17 * 60), "15:00 +1");
        // 22:00 + 27h00m crosses two midnights.
        assert_eq!(format_arrival(22, 0, 27 * 60), "01:00 +2");
    }

    #[test]
    fn departures_stay_inside_the_clock() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (hour, minute) = random_departure(&mut rng, 5, 21);
            assert!(hour < 24);
            assert!(MINUTE_GRID.contains(&minute));
        }
    }

    #[test]
    fn duration_display_matches_the_expected_shape() {
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(155), "2h 35m");
    }
}
