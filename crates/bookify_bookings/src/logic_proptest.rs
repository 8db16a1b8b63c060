#[cfg(test)]
mod tests {
    use crate::logic::overlaps;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    // Builds a non-empty interval from an offset and a length in minutes
    fn interval(offset: i64, length: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = base() + Duration::minutes(offset);
        (start, start + Duration::minutes(length))
    }

    proptest! {
        // For non-empty half-open intervals the predicate equals the textbook test
        #[test]
        fn test_matches_interval_intersection(
            a_offset in 0..2_000i64, a_len in 1..600i64,
            b_offset in 0..2_000i64, b_len in 1..600i64,
        ) {
            let (a_start, a_end) = interval(a_offset, a_len);
            let (b_start, b_end) = interval(b_offset, b_len);

            let expected = a_start < b_end && b_start < a_end;
            prop_assert_eq!(overlaps(a_start, a_end, b_start, b_end), expected);
        }

        #[test]
        fn test_is_symmetric(
            a_offset in 0..2_000i64, a_len in 1..600i64,
            b_offset in 0..2_000i64, b_len in 1..600i64,
        ) {
            let (a_start, a_end) = interval(a_offset, a_len);
            let (b_start, b_end) = interval(b_offset, b_len);

            prop_assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end)
            );
        }

        // A booking that starts exactly when another ends never conflicts with it
        #[test]
        fn test_back_to_back_never_overlaps(
            offset in 0..2_000i64, first_len in 1..600i64, second_len in 1..600i64,
        ) {
            let (first_start, first_end) = interval(offset, first_len);
            let second_start = first_end;
            let second_end = second_start + Duration::minutes(second_len);

            prop_assert!(!overlaps(second_start, second_end, first_start, first_end));
            prop_assert!(!overlaps(first_start, first_end, second_start, second_end));
        }

        #[test]
        fn test_interval_overlaps_itself(offset in 0..2_000i64, len in 1..600i64) {
            let (start, end) = interval(offset, len);
            prop_assert!(overlaps(start, end, start, end));
        }
    }
}
