//! Curriculum table
//!
//! Maps a topic key to its ordered day descriptions. Loaded from the
//! `curriculum` config section so new tracks need no code changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Day count used when the duration has no usable leading number
pub const DEFAULT_DAYS: usize = 5;

/// Default ceiling on plan lines, a century of days
pub const DEFAULT_MAX_DAYS: usize = 36_500;

/// Topic-keyed curricula with a generic fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curriculum {
    /// Day descriptions per topic key
    pub tracks: BTreeMap<String, Vec<String>>,

    /// Phases used when the topic has no track
    pub fallback: Vec<String>,

    /// Match topic keys ignoring case (exact match otherwise)
    #[serde(rename = "case-insensitive")]
    pub case_insensitive: bool,

    /// Upper bound on the number of plan lines
    #[serde(rename = "max-days")]
    pub max_days: usize,
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Curriculum {
    fn default() -> Self {
        let mut tracks = BTreeMap::new();
        tracks.insert(
            "Python".to_string(),
            lines(&[
                "Day 1: Basics, Variables & Types",
                "Day 2: Control Flow (If/Else, Loops)",
                "Day 3: Functions & Modules",
                "Day 4: Data Structures (Lists, Dicts)",
                "Day 5: Capstone Project (Simple CLI App)",
            ]),
        );
        tracks.insert(
            "React".to_string(),
            lines(&[
                "Day 1: JSX & Components",
                "Day 2: Props & State management",
                "Day 3: Hooks (useEffect, useState)",
                "Day 4: API Integration & Routing",
                "Day 5: Build a Todo App",
            ]),
        );

        Self {
            tracks,
            fallback: lines(&[
                "Phase 1: Fundamental concepts and setup",
                "Phase 2: Intermediate techniques and patterns",
                "Phase 3: Real-world application and building",
                "Phase 4: Optimization and deep dive",
                "Phase 5: Final project and review",
            ]),
            case_insensitive: false,
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

impl Curriculum {
    /// The track for `topic`, or the fallback phases
    pub fn lookup(&self, topic: &str) -> &[String] {
        debug!(%topic, case_insensitive = self.case_insensitive, "Curriculum::lookup: called");
        let track = if self.case_insensitive {
            self.tracks
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(topic))
                .map(|(_, days)| days)
        } else {
            self.tracks.get(topic)
        };

        match track {
            Some(days) => {
                debug!(%topic, "Curriculum::lookup: found track");
                days
            }
            None => {
                debug!(%topic, "Curriculum::lookup: using fallback");
                &self.fallback
            }
        }
    }

    /// Number of plan lines for a duration string like `"5 days"`
    ///
    /// Reads the leading integer; missing or zero means [`DEFAULT_DAYS`].
    pub fn day_count(&self, duration: &str) -> usize {
        debug!(%duration, "Curriculum::day_count: called");
        let digits: String = duration.trim_start().chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            debug!("Curriculum::day_count: no leading number, using default");
            return DEFAULT_DAYS;
        }
        match digits.parse::<usize>() {
            Ok(0) => DEFAULT_DAYS,
            Ok(n) => n.min(self.max_days),
            Err(_) => {
                debug!(%digits, "Curriculum::day_count: number too large, capping");
                self.max_days
            }
        }
    }

    /// One description per day for `topic` over `duration`
    pub fn days(&self, topic: &str, duration: &str) -> Vec<String> {
        debug!(%topic, %duration, "Curriculum::days: called");
        let items = self.lookup(topic);
        (1..=self.day_count(duration))
            .map(|i| {
                items
                    .get(i - 1)
                    .cloned()
                    .unwrap_or_else(|| format!("Day {}: Advanced {} implementation and practice", i, topic))
            })
            .collect()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_match() {
        let curriculum = Curriculum::default();
        assert_eq!(curriculum.lookup("Python")[0], "Day 1: Basics, Variables & Types");
        assert_eq!(curriculum.lookup("python")[0], "Phase 1: Fundamental concepts and setup");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let curriculum = Curriculum {
            case_insensitive: true,
            ..Default::default()
        };
        assert_eq!(curriculum.lookup("react")[0], "Day 1: JSX & Components");
    }

    #[test]
    fn test_day_count() {
        let curriculum = Curriculum::default();
        assert_eq!(curriculum.day_count("5 days"), 5);
        assert_eq!(curriculum.day_count("12 weeks"), 12);
        assert_eq!(curriculum.day_count("a few days"), DEFAULT_DAYS);
        assert_eq!(curriculum.day_count("0 days"), DEFAULT_DAYS);
        assert_eq!(curriculum.day_count("500 days"), 500);
        assert_eq!(curriculum.day_count("99999 days"), DEFAULT_MAX_DAYS);
        assert_eq!(curriculum.day_count("99999999999999999999999 days"), DEFAULT_MAX_DAYS);
    }

    #[test]
    fn test_long_plan_is_not_truncated() {
        let days = Curriculum::default().days("Python", "500 days");
        assert_eq!(days.len(), 500);
        assert_eq!(days[499], "Day 500: Advanced Python implementation and practice");
    }

    #[test]
    fn test_configured_cap() {
        let curriculum = Curriculum {
            max_days: 30,
            ..Default::default()
        };
        assert_eq!(curriculum.days("Rust", "90 days").len(), 30);
    }

    #[test]
    fn test_days_pads_beyond_track() {
        let days = Curriculum::default().days("React", "7 days");
        assert_eq!(days.len(), 7);
        assert_eq!(days[4], "Day 5: Build a Todo App");
        assert_eq!(days[5], "Day 6: Advanced React implementation and practice");
        assert_eq!(days[6], "Day 7: Advanced React implementation and practice");
    }

    #[test]
    fn test_days_unknown_topic_uses_fallback() {
        let days = Curriculum::default().days("Quantum Foo", "3 days");
        assert_eq!(
            days,
            vec![
                "Phase 1: Fundamental concepts and setup",
                "Phase 2: Intermediate techniques and patterns",
                "Phase 3: Real-world application and building",
            ]
        );
    }

    #[test]
    fn test_deserialize_custom_track() {
        let yaml = r#"
tracks:
  Rust:
    - "Day 1: Ownership"
    - "Day 2: Traits"
case-insensitive: true
"#;
        let curriculum: Curriculum = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(curriculum.lookup("rust")[1], "Day 2: Traits");
        // Unset keys keep their defaults
        assert_eq!(curriculum.max_days, DEFAULT_MAX_DAYS);
        assert_eq!(curriculum.fallback.len(), 5);
        assert!(!curriculum.tracks.contains_key("Python"));
    }
}
