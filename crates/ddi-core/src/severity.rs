use serde::Serialize;
use std::fmt;

const HIGH_KEYWORDS: &[&str] = &["major", "high"];
const MEDIUM_KEYWORDS: &[&str] = &["moderate", "medium"];

/// Coarse display bucket for a severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(label: &str) -> Tier {
    let lower = label.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|keyword| lower.contains(keyword));
    if matches(HIGH_KEYWORDS) {
        Tier::High
    } else if matches(MEDIUM_KEYWORDS) {
        Tier::Medium
    } else {
        Tier::Low
    }
}
