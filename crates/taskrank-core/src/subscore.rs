//! Sub-score functions.
//!
//! Each function maps one normalized field into [0, 1], higher meaning
//! "do this sooner":
//!
//! | Sub-score  | 1.0 when                      | 0.0 when                        |
//! |------------|-------------------------------|---------------------------------|
//! | urgency    | 30+ days overdue              | due 365+ days out, or no date   |
//! | importance | importance 10                 | importance 1                    |
//! | effort     | zero hours (quick win)        | 40+ hours                       |
//!
//! The breakpoints are fixed constants; they are kept exactly so that
//! scores stay comparable with previously computed rankings.

use chrono::NaiveDate;

/// Days assumed until a task with no due date is due (about five years).
pub const FAR_FUTURE_DAYS: i64 = 365 * 5;
/// Overdue by this many days or more saturates urgency at 1.0.
pub const OVERDUE_SATURATION_DAYS: i64 = 30;
/// Due this many days out or more drops urgency to 0.0.
pub const URGENCY_HORIZON_DAYS: i64 = 365;
/// Hours at or above which effort scores 0.0.
pub const EFFORT_CEILING_HOURS: f64 = 40.0;
/// Lower anchor of the linear effort ramp.
pub const EFFORT_FLOOR_HOURS: f64 = 0.25;
/// Lowest accepted importance value.
pub const IMPORTANCE_MIN: f64 = 1.0;
/// Highest accepted importance value.
pub const IMPORTANCE_MAX: f64 = 10.0;

/// Whole days from `today` until `due`; negative when overdue.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

/// Deadline urgency.
///
/// Linear over the window `[-30, 365)` days, saturating outside it.
pub fn urgency_score(due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let days = due.map_or(FAR_FUTURE_DAYS, |d| days_until(d, today));

    if days <= -OVERDUE_SATURATION_DAYS {
        return 1.0;
    }
    if days >= URGENCY_HORIZON_DAYS {
        return 0.0;
    }

    let window = (URGENCY_HORIZON_DAYS + OVERDUE_SATURATION_DAYS) as f64;
    let days_norm = (days + OVERDUE_SATURATION_DAYS) as f64 / window;
    (1.0 - days_norm).clamp(0.0, 1.0)
}

/// Stated importance on the 1..=10 scale mapped linearly into [0, 1].
///
/// Values outside the scale are clamped first.
pub fn importance_score(importance: f64) -> f64 {
    let clamped = importance.clamp(IMPORTANCE_MIN, IMPORTANCE_MAX);
    (clamped - IMPORTANCE_MIN) / (IMPORTANCE_MAX - IMPORTANCE_MIN)
}

/// Quick-win score for an estimated number of hours.
///
/// Zero or negative estimates are maximal quick wins; 40 hours and up
/// score nothing.
pub fn effort_score(hours: f64) -> f64 {
    if hours <= 0.0 {
        return 1.0;
    }
    if hours >= EFFORT_CEILING_HOURS {
        return 0.0;
    }
    let span = EFFORT_CEILING_HOURS - EFFORT_FLOOR_HOURS;
    (1.0 - (hours - EFFORT_FLOOR_HOURS) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_urgency_saturates_when_well_overdue() {
        assert_eq!(urgency_score(Some(today() - Duration::days(30)), today()), 1.0);
        assert_eq!(urgency_score(Some(today() - Duration::days(400)), today()), 1.0);
    }

    #[test]
    fn test_urgency_zero_beyond_horizon_or_missing() {
        assert_eq!(urgency_score(Some(today() + Duration::days(365)), today()), 0.0);
        assert_eq!(urgency_score(None, today()), 0.0);
    }

    #[test]
    fn test_urgency_due_today() {
        let u = urgency_score(Some(today()), today());
        assert!((u - (1.0 - 30.0 / 395.0)).abs() < 1e-12);
    }

    #[test]
    fn test_importance_mapping() {
        assert_eq!(importance_score(1.0), 0.0);
        assert_eq!(importance_score(10.0), 1.0);
        assert!((importance_score(5.0) - 4.0 / 9.0).abs() < 1e-12);
        assert_eq!(importance_score(-3.0), 0.0);
        assert_eq!(importance_score(42.0), 1.0);
    }

    #[test]
    fn test_effort_edges() {
        assert_eq!(effort_score(0.0), 1.0);
        assert_eq!(effort_score(-2.0), 1.0);
        assert_eq!(effort_score(40.0), 0.0);
        assert_eq!(effort_score(100.0), 0.0);
        assert_eq!(effort_score(0.25), 1.0);
    }

    #[test]
    fn test_effort_default_hours() {
        let e = effort_score(4.0);
        assert!((e - 0.9057).abs() < 1e-4, "got {e}");
    }

    proptest! {
        #[test]
        fn urgency_is_bounded_and_non_increasing(a in -1000i64..2000, b in -1000i64..2000) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            let u_near = urgency_score(Some(today() + Duration::days(near)), today());
            let u_far = urgency_score(Some(today() + Duration::days(far)), today());
            prop_assert!((0.0..=1.0).contains(&u_near));
            prop_assert!((0.0..=1.0).contains(&u_far));
            prop_assert!(u_near >= u_far);
        }

        #[test]
        fn effort_is_bounded_and_non_increasing(a in -50.0f64..100.0, b in -50.0f64..100.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let e_low = effort_score(low);
            let e_high = effort_score(high);
            prop_assert!((0.0..=1.0).contains(&e_low));
            prop_assert!(e_low >= e_high);
        }

        #[test]
        fn importance_matches_clamped_formula(i in -20.0f64..30.0) {
            let expected = (i.clamp(1.0, 10.0) - 1.0) / 9.0;
            prop_assert!((importance_score(i) - expected).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(&importance_score(i)));
        }
    }
}
