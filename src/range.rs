//! Single-pass generators for the independent-variable values of a sweep.
//! Restarting a sweep means building a new range.

/// Yields `begin, begin + step, ...` while `<= end`, then exhausts.
pub struct LinearRange {
    cursor: u64,
    end: u64,
    step: u64,
    done: bool,
}

impl LinearRange {
    pub fn new(begin: u64, end: u64, step: u64) -> LinearRange {
        assert!(step > 0, "a zero step would never terminate");
        LinearRange {
            cursor: begin,
            end: end,
            step: step,
            done: false,
        }
    }
}

impl Iterator for LinearRange {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done || self.cursor > self.end {
            self.done = true;
            return None;
        }
        let value = self.cursor;
        match self.cursor.checked_add(self.step) {
            Some(next) => self.cursor = next,
            None => self.done = true,
        }
        Some(value)
    }
}

/// Yields `2^begin, 2^(begin + step), ... 2^end`, so a batch-size sweep
/// covers orders of magnitude with few samples.
pub struct PowerRange {
    exponents: LinearRange,
}

impl PowerRange {
    pub fn new(begin: u64, end: u64, step: u64) -> PowerRange {
        assert!(end <= 63, "2^end must fit in u64");
        PowerRange { exponents: LinearRange::new(begin, end, step) }
    }
}

impl Iterator for PowerRange {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.exponents.next().map(|exp| 1u64 << exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_yields_inclusive_end() {
        let values: Vec<u64> = LinearRange::new(2, 10, 2).collect();
        assert_eq!(values, [2, 4, 6, 8, 10]);
    }

    #[test]
    fn linear_stays_exhausted() {
        let mut range = LinearRange::new(1, 3, 1);
        assert_eq!(range.by_ref().count(), 3);
        assert_eq!(range.next(), None);
        assert_eq!(range.next(), None);
    }

    #[test]
    fn linear_step_may_overshoot_end() {
        let values: Vec<u64> = LinearRange::new(2, 9, 3).collect();
        assert_eq!(values, [2, 5, 8]);
    }

    #[test]
    fn linear_single_value() {
        let values: Vec<u64> = LinearRange::new(7, 7, 1).collect();
        assert_eq!(values, [7]);
    }

    #[test]
    fn linear_empty_when_begin_past_end() {
        assert_eq!(LinearRange::new(5, 3, 1).next(), None);
    }

    #[test]
    fn power_yields_powers_of_two() {
        let values: Vec<u64> = PowerRange::new(0, 4, 1).collect();
        assert_eq!(values, [1, 2, 4, 8, 16]);
    }

    #[test]
    fn power_respects_step() {
        let values: Vec<u64> = PowerRange::new(1, 5, 2).collect();
        assert_eq!(values, [2, 8, 32]);
    }

    #[test]
    fn power_is_strictly_increasing() {
        let values: Vec<u64> = PowerRange::new(0, 14, 1).collect();
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
