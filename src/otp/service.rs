use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use time::{Duration, OffsetDateTime};

/// Generate a 6-digit one-time code, uniform over [100000, 999999].
/// Drawn from the OS entropy source so codes are not predictable from
/// generator state.
pub fn generate_code() -> String {
    let n: u32 = OsRng.gen_range(100_000..=999_999);
    n.to_string()
}

/// Whether a challenge issued at `issued_at` is still inside its
/// validity window at `now`. Strict comparison: a code is already
/// expired the moment the full window has elapsed.
pub fn window_open(issued_at: OffsetDateTime, now: OffsetDateTime, validity: Duration) -> bool {
    now - issued_at < validity
}

/// Constant-time code comparison so a mismatch reveals nothing about
/// where the digits diverge.
pub fn codes_match(submitted: &str, stored: &str) -> bool {
    constant_time_eq(submitted.as_bytes(), stored.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_stay_in_range() {
        for _ in 0..10_000 {
            let code = generate_code();
            let n: u32 = code.parse().expect("code is numeric");
            assert!((100_000..=999_999).contains(&n), "out of range: {n}");
            assert_eq!(code.len(), 6);
        }
    }

    #[test]
    fn generated_codes_spread_over_the_range() {
        // Every leading digit 1-9 should show up across 10k draws;
        // a stuck generator would fail this immediately.
        let mut seen = [false; 10];
        for _ in 0..10_000 {
            let lead = generate_code().as_bytes()[0] - b'0';
            seen[lead as usize] = true;
        }
        for d in 1..=9 {
            assert!(seen[d], "leading digit {d} never generated");
        }
        assert!(!seen[0]);
    }

    #[test]
    fn window_open_just_before_expiry() {
        let issued = OffsetDateTime::now_utc();
        let validity = Duration::seconds(600);
        assert!(window_open(issued, issued + Duration::seconds(599), validity));
    }

    #[test]
    fn window_closed_at_exact_expiry() {
        let issued = OffsetDateTime::now_utc();
        let validity = Duration::seconds(600);
        // exactly 600s is already expired
        assert!(!window_open(issued, issued + Duration::seconds(600), validity));
        assert!(!window_open(issued, issued + Duration::seconds(601), validity));
    }

    #[test]
    fn codes_match_is_exact() {
        assert!(codes_match("123456", "123456"));
        assert!(!codes_match("123456", "123457"));
        assert!(!codes_match("123456", "12345"));
    }
}
