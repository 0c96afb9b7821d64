use chrono::{DateTime, Utc};

/// Half-life, in hours, for the exponential decay term of the priority
/// score (spec.md §4.6): one week.
const HALF_LIFE_HOURS: f64 = 168.0;

/// Decay floor — confidence never decays below 10% of its base value.
const DECAY_FLOOR: f64 = 0.1;

/// `confidence_decayed = quality_score * max(exp(-ln2 * Δh / 168), 0.1)`
/// where `Δh` is hours since `reference` (last_accessed or created_at).
pub fn confidence_decayed(quality_score: f64, reference: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta_hours = (now - reference).num_seconds() as f64 / 3600.0;
    let delta_hours = delta_hours.max(0.0);
    let decay = (-std::f64::consts::LN_2 * delta_hours / HALF_LIFE_HOURS).exp();
    quality_score * decay.max(DECAY_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn no_elapsed_time_means_no_decay() {
        let now = Utc::now();
        assert!((confidence_decayed(0.8, now, now) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn one_half_life_halves_the_score() {
        let now = Utc::now();
        let ref_time = now - Duration::hours(168);
        let decayed = confidence_decayed(0.8, ref_time, now);
        assert!((decayed - 0.4).abs() < 1e-6);
    }

    #[test]
    fn decay_never_drops_below_the_floor() {
        let now = Utc::now();
        let ref_time = now - Duration::days(3650);
        let decayed = confidence_decayed(1.0, ref_time, now);
        assert!((decayed - DECAY_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn future_reference_is_clamped_to_zero_elapsed() {
        let now = Utc::now();
        let ref_time = now + Duration::hours(10);
        assert!((confidence_decayed(0.5, ref_time, now) - 0.5).abs() < 1e-9);
    }
}
