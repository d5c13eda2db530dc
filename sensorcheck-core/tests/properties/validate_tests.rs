//! Property tests for range validation

use proptest::prelude::*;
use sensorcheck_core::sensors::{Range, Ranges, Readings, validate};

fn arb_readings() -> impl Strategy<Value = Readings> {
    (
        prop::collection::vec(-100.0f64..200.0, 0..10),
        prop::collection::vec(-10.0f64..150.0, 0..10),
    )
        .prop_map(|(temp, hum)| Readings { temp, hum })
}

fn arb_range() -> impl Strategy<Value = Range> {
    (-100.0f64..200.0, -100.0f64..200.0).prop_map(|(a, b)| Range::new(a, b))
}

proptest! {
    /// Property: one issue per reading outside its closed interval
    #[test]
    fn issue_count_matches_out_of_range(
        readings in arb_readings(),
        temp in arb_range(),
        hum in arb_range(),
    ) {
        let ranges = Ranges { temp, hum };
        let outside = readings.temp.iter().filter(|v| **v < temp.min || **v > temp.max).count()
            + readings.hum.iter().filter(|v| **v < hum.min || **v > hum.max).count();

        prop_assert_eq!(validate(&readings, &ranges).len(), outside);
    }

    /// Property: readings filtered down to their ranges produce no issues
    #[test]
    fn in_range_readings_pass(readings in arb_readings(), temp in arb_range(), hum in arb_range()) {
        let ranges = Ranges { temp, hum };
        let passing = Readings {
            temp: readings.temp.iter().copied().filter(|v| temp.contains(*v)).collect(),
            hum: readings.hum.iter().copied().filter(|v| hum.contains(*v)).collect(),
        };

        prop_assert!(validate(&passing, &ranges).is_empty());
    }

    /// Property: an inverted range rejects every reading of its kind
    #[test]
    fn inverted_range_rejects_all(
        readings in arb_readings(),
        lo in -50.0f64..0.0,
        span in 0.1f64..100.0,
    ) {
        let ranges = Ranges {
            temp: Range::new(lo + span, lo),
            hum: Range::new(f64::MIN, f64::MAX),
        };
        let issues = validate(&readings, &ranges);

        prop_assert_eq!(issues.len(), readings.temp.len());
        for (i, issue) in issues.iter().enumerate() {
            prop_assert_eq!(issue.index, i + 1);
        }
    }

    /// Property: empty readings never produce issues
    #[test]
    fn empty_readings_pass(temp in arb_range(), hum in arb_range()) {
        let ranges = Ranges { temp, hum };
        prop_assert!(validate(&Readings::default(), &ranges).is_empty());
    }
}
