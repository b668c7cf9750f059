//! Duration estimation and position/index mapping for sentence playback.
//!
//! Everything here is a pure function over the sentence list and a speed
//! value; the stateful cursor lives in [`crate::session`]. Durations are
//! estimates from word count, good enough to drive highlighting and seeking
//! until real synthesis timings replace them.

use std::time::Instant;

/// Absolute speed floor applied by the adaptive ramp regardless of
/// configuration.
pub const ADAPTIVE_SPEED_FLOOR: f64 = 0.5;

/// Estimate one duration per sentence from word count and playback speed.
///
/// A sentence with no whitespace-delimited words gets a flat second; every
/// estimate is floored at `min_secs`. The result always has the same length
/// as `sentences`.
///
/// `speed` must be positive; a non-positive speed is a caller bug and
/// panics rather than producing infinite durations.
pub fn estimate_durations(
    sentences: &[String],
    speed: f64,
    words_per_minute: f64,
    min_secs: f64,
) -> Vec<f64> {
    assert!(speed > 0.0, "playback speed must be positive, got {speed}");
    assert!(
        words_per_minute > 0.0,
        "words_per_minute must be positive, got {words_per_minute}"
    );

    sentences
        .iter()
        .map(|sentence| {
            let word_count = sentence.split_whitespace().count();
            let estimate = if word_count > 0 {
                (word_count as f64 / words_per_minute) * 60.0 / speed
            } else {
                1.0
            };
            estimate.max(min_secs)
        })
        .collect()
}

/// Map a playback position in seconds to the sentence playing at that time.
///
/// Returns the first index whose cumulative time window contains the
/// position. Positions past the end of the table saturate to the last index;
/// an empty table yields index zero, which callers guard against by never
/// syncing without loaded sentences.
pub fn locate_sentence(durations: &[f64], position_seconds: f64) -> usize {
    let mut elapsed = 0.0;
    for (index, duration) in durations.iter().enumerate() {
        if position_seconds < elapsed + duration {
            return index;
        }
        elapsed += duration;
    }
    durations.len().saturating_sub(1)
}

/// Cumulative playback time before the given sentence starts.
///
/// The inverse direction of [`locate_sentence`]; indexes past the end clamp
/// to the start of the last sentence.
pub fn sentence_start_time(durations: &[f64], index: usize) -> f64 {
    let clamped = index.min(durations.len().saturating_sub(1));
    durations.iter().take(clamped).sum()
}

/// Step the playback speed up with elapsed session time.
///
/// The ramp is a monotone non-decreasing step function: one `increment` per
/// full `interval_minutes` elapsed since `session_start`, saturating at
/// `max_speed` and never dropping below the absolute floor.
pub fn compute_adaptive_speed(
    session_start: Instant,
    now: Instant,
    start_speed: f64,
    increment: f64,
    interval_minutes: u64,
    max_speed: f64,
) -> f64 {
    let elapsed_minutes = now.saturating_duration_since(session_start).as_secs_f64() / 60.0;
    let interval = interval_minutes.max(1) as f64;
    let increments = (elapsed_minutes / interval).floor();
    (start_speed + increments * increment)
        .max(ADAPTIVE_SPEED_FLOOR)
        .min(max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sentences(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn duration_table_matches_sentence_count() {
        let input = sentences(&["One two three.", "Four.", ""]);
        let durations = estimate_durations(&input, 1.0, 150.0, 0.5);
        assert_eq!(durations.len(), input.len());
    }

    #[test]
    fn word_count_drives_the_estimate() {
        // 150 words at 150 wpm and speed 1.0 is exactly a minute.
        let long = vec!["word ".repeat(150)];
        let durations = estimate_durations(&long, 1.0, 150.0, 0.5);
        assert!((durations[0] - 60.0).abs() < 1e-9);

        // Doubling the speed halves the estimate.
        let fast = estimate_durations(&long, 2.0, 150.0, 0.5);
        assert!((fast[0] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn estimates_never_drop_below_the_floor() {
        let input = sentences(&["Hi.", "A", ""]);
        for speed in [0.5, 1.0, 3.0, 100.0] {
            for duration in estimate_durations(&input, speed, 150.0, 0.5) {
                assert!(duration >= 0.5, "speed {speed} produced {duration}");
            }
        }
    }

    #[test]
    fn wordless_sentences_get_a_flat_second() {
        let input = sentences(&["   "]);
        let durations = estimate_durations(&input, 10.0, 150.0, 0.5);
        assert!((durations[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "speed must be positive")]
    fn non_positive_speed_panics() {
        estimate_durations(&sentences(&["Hello."]), 0.0, 150.0, 0.5);
    }

    #[test]
    fn locate_walks_cumulative_windows() {
        let durations = [2.0, 3.0, 5.0];
        assert_eq!(locate_sentence(&durations, 0.0), 0);
        assert_eq!(locate_sentence(&durations, 1.9), 0);
        assert_eq!(locate_sentence(&durations, 2.0), 1);
        assert_eq!(locate_sentence(&durations, 4.9), 1);
        assert_eq!(locate_sentence(&durations, 5.0), 2);
        assert_eq!(locate_sentence(&durations, 9.9), 2);
    }

    #[test]
    fn locate_saturates_past_the_end() {
        let durations = [2.0, 3.0, 5.0];
        assert_eq!(locate_sentence(&durations, 10.0), 2);
        assert_eq!(locate_sentence(&durations, 1e9), 2);
    }

    #[test]
    fn locate_is_monotone_in_position() {
        let durations = [0.5, 4.0, 1.0, 2.5];
        let mut last = 0;
        for step in 0..100 {
            let index = locate_sentence(&durations, step as f64 * 0.1);
            assert!(index >= last);
            last = index;
        }
    }

    #[test]
    fn start_time_inverts_locate() {
        let durations = [2.0, 3.0, 5.0];
        for index in 0..durations.len() {
            let start = sentence_start_time(&durations, index);
            assert_eq!(locate_sentence(&durations, start), index);
        }
        // Past-the-end indexes clamp to the last sentence's start.
        assert!((sentence_start_time(&durations, 99) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn adaptive_speed_steps_with_elapsed_time() {
        let start = Instant::now();
        let later = start + Duration::from_secs(44 * 60);
        let speed = compute_adaptive_speed(start, later, 1.5, 0.1, 15, 2.5);
        assert!((speed - 1.7).abs() < 1e-9);
    }

    #[test]
    fn adaptive_speed_saturates_at_max() {
        let start = Instant::now();
        let later = start + Duration::from_secs(200 * 60);
        let speed = compute_adaptive_speed(start, later, 1.5, 0.1, 15, 2.5);
        assert!((speed - 2.5).abs() < 1e-9);
    }

    #[test]
    fn adaptive_speed_never_drops_below_absolute_floor() {
        let start = Instant::now();
        let speed = compute_adaptive_speed(start, start, 0.1, 0.1, 15, 2.5);
        assert!((speed - ADAPTIVE_SPEED_FLOOR).abs() < 1e-9);
    }

    #[test]
    fn zero_interval_is_treated_as_one_minute() {
        let start = Instant::now();
        let later = start + Duration::from_secs(120);
        let speed = compute_adaptive_speed(start, later, 1.0, 0.1, 0, 2.5);
        assert!((speed - 1.2).abs() < 1e-9);
    }
}
