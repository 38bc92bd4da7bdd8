//! Structured profiling for the search loop
//!
//! Collects timing and counting data during search when enabled via
//! `ProverConfig::enable_profiling`. All instrumentation is gated on
//! `Option::None` when disabled.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::time::Duration;

fn secs(d: &Duration) -> f64 {
    d.as_secs_f64()
}

/// Statistics for one inference rule
#[derive(Debug, Clone, Default)]
pub struct RuleStats {
    pub attempts: usize,
    pub successes: usize,
    pub time: Duration,
}

impl Serialize for RuleStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RuleStats", 3)?;
        s.serialize_field("attempts", &self.attempts)?;
        s.serialize_field("successes", &self.successes)?;
        s.serialize_field("time", &secs(&self.time))?;
        s.end()
    }
}

/// Profiling data collected during search.
///
/// All `Duration` fields are serialized as `f64` seconds.
#[derive(Debug, Clone, Default)]
pub struct SearchProfile {
    // Phase timings
    pub total_time: Duration,
    pub init_time: Duration,
    pub decompose_time: Duration,
    pub expand_time: Duration,

    // Aggregate counters
    pub batches: usize,
    pub candidates_examined: usize,
    pub admitted: usize,
    pub duplicates: usize,
    pub deferred: usize,
    pub derived: usize,
    pub deepenings: usize,
    pub max_frontier_size: usize,
    pub final_max_len: usize,

    pub rules: HashMap<String, RuleStats>,
}

impl SearchProfile {
    /// Record one application attempt of a rule
    pub fn record_rule(&mut self, name: &str, success: bool, time: Duration) {
        let stats = self.rules.entry(name.to_string()).or_default();
        stats.attempts += 1;
        stats.time += time;
        if success {
            stats.successes += 1;
        }
    }
}

impl Serialize for SearchProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SearchProfile", 14)?;

        s.serialize_field("total_time", &secs(&self.total_time))?;
        s.serialize_field("init_time", &secs(&self.init_time))?;
        s.serialize_field("decompose_time", &secs(&self.decompose_time))?;
        s.serialize_field("expand_time", &secs(&self.expand_time))?;

        s.serialize_field("batches", &self.batches)?;
        s.serialize_field("candidates_examined", &self.candidates_examined)?;
        s.serialize_field("admitted", &self.admitted)?;
        s.serialize_field("duplicates", &self.duplicates)?;
        s.serialize_field("deferred", &self.deferred)?;
        s.serialize_field("derived", &self.derived)?;
        s.serialize_field("deepenings", &self.deepenings)?;
        s.serialize_field("max_frontier_size", &self.max_frontier_size)?;
        s.serialize_field("final_max_len", &self.final_max_len)?;

        s.serialize_field("rules", &self.rules)?;

        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_serializes() {
        let profile = SearchProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"total_time\":0.0"));
        assert!(json.contains("\"batches\":0"));
        assert!(json.contains("\"rules\":{}"));
    }

    #[test]
    fn test_record_rule() {
        let mut profile = SearchProfile::default();
        profile.record_rule("mp", true, Duration::from_millis(500));
        profile.record_rule("mp", false, Duration::from_millis(1000));
        profile.total_time = Duration::from_millis(1500);

        let stats = &profile.rules["mp"];
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.successes, 1);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"total_time\":1.5"));
        assert!(json.contains("\"attempts\":2"));
        assert!(json.contains("\"time\":1.5"));
    }
}
