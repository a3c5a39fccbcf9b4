//! Sequential region and line identifiers.
//!
//! Ids have the form `region_0001` and `region_0001_line_0003`. The line
//! counter restarts at zero each time a new region id is issued.

use std::collections::HashMap;

/// Counter name for regions.
pub const REGION: &str = "region";

/// Counter name for lines within the current region.
pub const LINE: &str = "line";

/// Named counters that mint region and line ids.
///
/// Values are not validated: negative values set by the caller end up in
/// the formatted ids as-is.
///
/// # Example
///
/// ```
/// use pagexml::IdCounter;
///
/// let mut ids = IdCounter::new();
/// assert_eq!(ids.next_region_id(), "region_0001");
/// assert_eq!(ids.next_line_id(), "region_0001_line_0001");
/// assert_eq!(ids.next_line_id(), "region_0001_line_0002");
/// assert_eq!(ids.next_region_id(), "region_0002");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    counters: HashMap<String, i64>,
    initial_region: i64,
    initial_line: i64,
}

impl IdCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter that resumes numbering from the given values.
    pub fn with_start(region: i64, line: i64) -> Self {
        let mut counter = Self {
            counters: HashMap::new(),
            initial_region: region,
            initial_line: line,
        };
        counter.reset();
        counter
    }

    /// Restore the start values given at construction.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.set(REGION, self.initial_region);
        self.set(LINE, self.initial_line);
    }

    /// Current value of a counter (0 if never set).
    pub fn get(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Overwrite a counter.
    pub fn set(&mut self, name: &str, value: i64) {
        self.counters.insert(name.to_string(), value);
    }

    /// Add `delta` to a counter, wrapping on overflow.
    pub fn inc(&mut self, name: &str, delta: i64) {
        let value = self.get(name).wrapping_add(delta);
        self.set(name, value);
    }

    /// Advance the region counter, reset the line counter and return the
    /// new region id.
    pub fn next_region_id(&mut self) -> String {
        self.inc(REGION, 1);
        self.set(LINE, 0);
        self.region_id(None)
    }

    /// Advance the line counter and return the new line id within the
    /// current region.
    pub fn next_line_id(&mut self) -> String {
        self.inc(LINE, 1);
        self.line_id(None, None)
    }

    /// Format a region id for `region` (or the current region counter).
    pub fn region_id(&self, region: Option<i64>) -> String {
        format!("region_{:04}", region.unwrap_or_else(|| self.get(REGION)))
    }

    /// Format a line id for the given (or current) region and line.
    pub fn line_id(&self, region: Option<i64>, line: Option<i64>) -> String {
        format!(
            "{}_line_{:04}",
            self.region_id(region),
            line.unwrap_or_else(|| self.get(LINE))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_string() {
        let mut c = IdCounter::new();
        assert_eq!(c.next_region_id(), "region_0001");
        assert_eq!(c.next_region_id(), "region_0002");
        assert_eq!(c.next_line_id(), "region_0002_line_0001");
        assert_eq!(c.next_region_id(), "region_0003");
        assert_eq!(c.next_line_id(), "region_0003_line_0001");
    }

    #[test]
    fn test_counter_init() {
        let c = IdCounter::with_start(2, 0);
        assert_eq!(c.get(REGION), 2);
        assert_eq!(c.get(LINE), 0);
    }

    #[test]
    fn test_counter_methods() {
        let mut c = IdCounter::new();
        assert_eq!(c.get(REGION), 0);
        c.inc(REGION, 5);
        assert_eq!(c.get(REGION), 5);
        c.set(REGION, 10);
        assert_eq!(c.get(REGION), 10);
        c.inc(REGION, -9);
        assert_eq!(c.get(REGION), 1);
        assert_eq!(c.get("unused"), 0);
    }

    #[test]
    fn test_lines_advance_within_region() {
        let mut c = IdCounter::with_start(6, 0);
        assert_eq!(c.next_region_id(), "region_0007");
        assert_eq!(c.next_line_id(), "region_0007_line_0001");
        assert_eq!(c.next_line_id(), "region_0007_line_0002");
        assert_eq!(c.next_line_id(), "region_0007_line_0003");
        assert_eq!(c.next_region_id(), "region_0008");
        assert_eq!(c.next_line_id(), "region_0008_line_0001");
    }

    #[test]
    fn test_resume_line_numbering() {
        let mut c = IdCounter::with_start(3, 4);
        assert_eq!(c.next_line_id(), "region_0003_line_0005");
    }

    #[test]
    fn test_reset() {
        let mut c = IdCounter::with_start(2, 1);
        c.next_region_id();
        c.next_line_id();
        c.set("custom", 9);
        c.reset();
        assert_eq!(c.get(REGION), 2);
        assert_eq!(c.get(LINE), 1);
        assert_eq!(c.get("custom"), 0);
    }

    #[test]
    fn test_explicit_ids() {
        let c = IdCounter::new();
        assert_eq!(c.region_id(Some(12)), "region_0012");
        assert_eq!(c.line_id(Some(3), Some(7)), "region_0003_line_0007");
        assert_eq!(c.line_id(None, None), "region_0000_line_0000");
    }

    #[test]
    fn test_formatting_widens_and_keeps_sign() {
        let mut c = IdCounter::new();
        c.set(REGION, 9999);
        assert_eq!(c.next_region_id(), "region_10000");

        c.set(REGION, -5);
        assert_eq!(c.region_id(None), "region_-005");
    }

    #[test]
    fn test_overflow_wraps_instead_of_panicking() {
        let mut c = IdCounter::new();
        c.set(REGION, i64::MAX);
        assert_eq!(c.next_region_id(), format!("region_{}", i64::MIN));
        assert_eq!(c.get(REGION), i64::MIN);

        c.set(LINE, i64::MAX);
        assert_eq!(
            c.next_line_id(),
            format!("region_{}_line_{}", i64::MIN, i64::MIN)
        );
    }
}
