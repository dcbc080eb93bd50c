use std::fmt::{Display, Formatter};

/// Elapsed time split into whole hours, minutes and seconds.
///
/// Hours are unbounded: a multi-day session shows `100:00:00` and beyond
/// rather than rolling over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Milliseconds at the start of this whole second.
    pub fn floor_ms(&self) -> u64 {
        self.hours * 3_600_000 + self.minutes * 60_000 + self.seconds * 1000
    }
}

impl Display for Hms {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Floor-decompose `ms` into hours, minutes and seconds.
pub fn to_hms(ms: u64) -> Hms {
    let total_seconds = ms / 1000;
    Hms {
        hours: total_seconds / 3600,
        minutes: (total_seconds % 3600) / 60,
        seconds: total_seconds % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_zero() {
        assert_eq!(
            to_hms(0),
            Hms {
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn floors_partial_seconds() {
        let hms = to_hms(59_999);
        assert_eq!((hms.hours, hms.minutes, hms.seconds), (0, 0, 59));
        let hms = to_hms(3_661_500);
        assert_eq!((hms.hours, hms.minutes, hms.seconds), (1, 1, 1));
    }

    #[test]
    fn hours_do_not_roll_over() {
        let hms = to_hms(100 * 3_600_000 + 5 * 60_000);
        assert_eq!(hms.hours, 100);
        assert_eq!(hms.to_string(), "100:05:00");
    }

    #[test]
    fn display_pads_to_two_digits() {
        assert_eq!(to_hms(4321).to_string(), "00:00:04");
        assert_eq!(to_hms(36_000_000 + 9 * 60_000).to_string(), "10:09:00");
    }

    #[test]
    fn decomposition_brackets_input() {
        let samples = [
            0,
            1,
            999,
            1000,
            59_999,
            60_000,
            3_599_999,
            3_600_000,
            86_399_999,
            123_456_789,
            u64::MAX / 2,
        ];
        for ms in samples {
            let hms = to_hms(ms);
            assert!(hms.minutes < 60 && hms.seconds < 60);
            assert!(hms.floor_ms() <= ms, "{ms}");
            assert!(ms < hms.floor_ms() + 1000, "{ms}");
        }
    }
}
