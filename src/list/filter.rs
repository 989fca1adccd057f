//! Typed filter schemas for list endpoints.
//!
//! Each list-backed screen defines one closed filter struct implementing
//! [`ListFilter`] instead of passing loosely-typed dictionaries around;
//! a typo in a filter key becomes a compile error rather than a silently
//! ignored constraint. Absent fields mean "no constraint".

use chrono::NaiveDate;

/// A closed, typed set of constraints a list endpoint accepts.
///
/// `Default` is the empty filter (no constraints). Implementations map
/// their set fields into wire query pairs and support clearing a single
/// constraint by its wire key.
pub trait ListFilter: Default + Clone + Send + Sync + 'static {
    /// Wire query pairs for every set field, in schema order.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Removes a single constraint by its wire key. Returns whether a
    /// constraint was actually removed.
    fn clear(&mut self, key: &str) -> bool;

    /// Whether no constraint is set.
    fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

/// Formats a date filter value the way the list endpoints expect it.
#[must_use]
pub fn date_param(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_param_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(date_param(&date), "2026-03-07");
    }
}
