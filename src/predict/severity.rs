//! Severity tiers derived from a diagnosis label

use serde::Serialize;
use std::fmt;

/// Display tier for a diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Yellow,
    Green,
}

impl Severity {
    /// `critical` is red, `needs_attention` is yellow, anything else is green
    pub fn from_label(label: &str) -> Self {
        match label {
            "critical" => Severity::Red,
            "needs_attention" => Severity::Yellow,
            _ => Severity::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Red => "red",
            Severity::Yellow => "yellow",
            Severity::Green => "green",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_known_labels() {
        assert_eq!(Severity::from_label("critical"), Severity::Red);
        assert_eq!(Severity::from_label("needs_attention"), Severity::Yellow);
        assert_eq!(Severity::from_label("stable"), Severity::Green);
        assert_eq!(Severity::from_label("Unable to predict"), Severity::Green);
    }

    #[test]
    fn test_match_is_exact() {
        assert_eq!(Severity::from_label("Critical"), Severity::Green);
        assert_eq!(Severity::from_label(" critical"), Severity::Green);
        assert_eq!(Severity::from_label("needs attention"), Severity::Green);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Severity::Red.to_string(), "red");
        assert_eq!(Severity::Yellow.to_string(), "yellow");
        assert_eq!(Severity::Green.to_string(), "green");
    }

    #[quickcheck]
    fn prop_severity_classification(label: String) -> bool {
        let expected = if label == "critical" {
            Severity::Red
        } else if label == "needs_attention" {
            Severity::Yellow
        } else {
            Severity::Green
        };
        Severity::from_label(&label) == expected
    }
}
