use crate::error::CoreError;

/// Tunables for the detection pipeline.
///
/// Defaults match the values CRASS itself ships with.
#[derive(Debug, Clone)]
pub struct Config {
    pub low_dr: usize,
    pub high_dr: usize,
    pub low_spacer: usize,
    pub high_spacer: usize,
    pub search_window_len: usize,
    pub min_num_repeats: usize,
    pub trim_confidence: f32,
    pub max_similarity: f32,
    pub spacer_to_spacer_delta: usize,
    pub spacer_to_repeat_delta: usize,
    pub low_complexity_threshold: f32,
    pub remove_homopolymers: bool,
    pub max_reads_for_decision: usize,
    pub threads: usize,
    pub scan_range: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            low_dr: 23,
            high_dr: 47,
            low_spacer: 26,
            high_spacer: 50,
            search_window_len: 8,
            min_num_repeats: 2,
            trim_confidence: 0.75,
            max_similarity: 0.75,
            spacer_to_spacer_delta: 30,
            spacer_to_repeat_delta: 30,
            low_complexity_threshold: 0.75,
            remove_homopolymers: false,
            max_reads_for_decision: 50,
            threads: 8,
            scan_range: 24,
        }
    }
}

/// Which per-record algorithm to run, chosen once per input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerKind {
    Long,
    Short,
}

impl Config {
    /// Cutoff read length above which [`ScannerKind::Long`] is preferred.
    ///
    /// A read with at least two spacers worth of room (`4*lowDR + 2*lowSpacer`)
    /// is long enough that the windowed seed-and-extend approach pays off;
    /// shorter reads get the single-pair short scanner instead.
    pub fn long_read_cutoff(&self) -> usize {
        4 * self.low_dr + 2 * self.low_spacer
    }

    pub fn decide_scanner(&self, average_read_length: f32) -> ScannerKind {
        if average_read_length > self.long_read_cutoff() as f32 {
            ScannerKind::Long
        } else {
            ScannerKind::Short
        }
    }

    /// Reject option combinations that would make the scanners ill-defined
    /// before a single record is read, rather than tripping obscure
    /// invariant failures mid-pass.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.low_dr == 0 || self.low_dr > self.high_dr {
            return Err(CoreError::Config(format!(
                "low_dr ({}) must be nonzero and <= high_dr ({})",
                self.low_dr, self.high_dr
            )));
        }
        if self.low_spacer > self.high_spacer {
            return Err(CoreError::Config(format!(
                "low_spacer ({}) must be <= high_spacer ({})",
                self.low_spacer, self.high_spacer
            )));
        }
        if self.search_window_len == 0 || self.search_window_len > self.low_dr {
            return Err(CoreError::Config(format!(
                "search_window_len ({}) must be nonzero and <= low_dr ({})",
                self.search_window_len, self.low_dr
            )));
        }
        if !(0.0..=1.0).contains(&self.trim_confidence) || self.trim_confidence <= 0.0 {
            return Err(CoreError::Config(format!(
                "trim_confidence ({}) must be in (0, 1]",
                self.trim_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.max_similarity) {
            return Err(CoreError::Config(format!(
                "max_similarity ({}) must be in [0, 1]",
                self.max_similarity
            )));
        }
        if !(0.0..=1.0).contains(&self.low_complexity_threshold) {
            return Err(CoreError::Config(format!(
                "low_complexity_threshold ({}) must be in [0, 1]",
                self.low_complexity_threshold
            )));
        }
        if self.threads == 0 {
            return Err(CoreError::Config("threads must be nonzero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_long_one_base_over() {
        let c = Config::default();
        let cutoff = c.long_read_cutoff();
        assert_eq!(c.decide_scanner(cutoff as f32), ScannerKind::Short);
        assert_eq!(c.decide_scanner((cutoff + 1) as f32), ScannerKind::Long);
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_dr_bounds() {
        let c = Config { low_dr: 50, high_dr: 23, ..Config::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_window_longer_than_low_dr() {
        let c = Config { search_window_len: 100, ..Config::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_threads() {
        let c = Config { threads: 0, ..Config::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_trim_confidence() {
        let c = Config { trim_confidence: 0.0, ..Config::default() };
        assert!(c.validate().is_err());
        let c = Config { trim_confidence: 1.5, ..Config::default() };
        assert!(c.validate().is_err());
    }
}
