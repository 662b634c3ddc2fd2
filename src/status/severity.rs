//! Keyword-based severity inference.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use super::compile_regex_unsafe;

/// Three-level health classification.
///
/// Variants are declared best-first so `Ord` ranks `Down` as the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumIterMacro)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Healthy
    Ok,
    /// Degraded, unknown or needs attention
    Warn,
    /// Unreachable or in a major outage
    Down,
}

impl Severity {
    /// Emoji-tagged label that prefixes every human-readable state.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Ok => "🟢 OK",
            Severity::Warn => "🟡 Warning",
            Severity::Down => "🔴 Down",
        }
    }

    /// Formats a state string such as `🟢 OK (200)`.
    pub fn state(&self, detail: impl fmt::Display) -> String {
        format!("{} ({})", self.tag(), detail)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Ok => "ok",
            Severity::Warn => "warn",
            Severity::Down => "down",
        })
    }
}

static DOWN_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"major|outage|down|unavailable|disruption|incident|critical|severe",
        "DOWN_KEYWORDS",
    )
});
static WARN_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"minor|partial|degrad|latenc|slow|investigating|issue|maintenance|notice",
        "WARN_KEYWORDS",
    )
});
static OK_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"healthy|operational|available|up|restored|resolved|normal|no issues|stable",
        "OK_KEYWORDS",
    )
});

/// Maps free text to a severity.
///
/// Keywords are matched as case-insensitive substrings. Down keywords win over
/// warn keywords, which win over ok keywords. Text with no keyword at all,
/// including empty text, is `Warn`: unknown is never reported as healthy.
pub fn classify(text: &str) -> Severity {
    let normalized = text.to_lowercase();
    if DOWN_KEYWORDS.is_match(&normalized) {
        Severity::Down
    } else if WARN_KEYWORDS.is_match(&normalized) {
        Severity::Warn
    } else if OK_KEYWORDS.is_match(&normalized) {
        Severity::Ok
    } else {
        Severity::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_down_keywords() {
        for text in [
            "Major outage",
            "Service DOWN",
            "API unavailable",
            "Network disruption",
            "Incident reported",
            "critical failure",
            "Severe degradation",
        ] {
            assert_eq!(classify(text), Severity::Down, "{}", text);
        }
    }

    #[test]
    fn test_down_takes_precedence_over_warn_and_ok() {
        assert_eq!(
            classify("Partial outage, some systems operational"),
            Severity::Down
        );
        assert_eq!(classify("Minor incident resolved"), Severity::Down);
        assert_eq!(classify("healthy but critical"), Severity::Down);
    }

    #[test]
    fn test_warn_keywords() {
        for text in [
            "Minor delays",
            "Partially working",
            "Degraded performance",
            "High latency",
            "Slow responses",
            "Investigating reports",
            "Known issue",
            "Scheduled maintenance",
            "Notice",
        ] {
            assert_eq!(classify(text), Severity::Warn, "{}", text);
        }
    }

    #[test]
    fn test_warn_takes_precedence_over_ok() {
        assert_eq!(
            classify("Operational with degraded performance"),
            Severity::Warn
        );
        assert_eq!(classify("Maintenance restored"), Severity::Warn);
    }

    #[test]
    fn test_ok_keywords() {
        for text in [
            "Healthy",
            "All Systems Operational",
            "Restored",
            "Resolved",
            "Normal",
            "No issues detected",
            "Stable",
        ] {
            // "No issues" contains "issue", a warn keyword, so it classifies as warn
            let expected = if text.contains("issues") {
                Severity::Warn
            } else {
                Severity::Ok
            };
            assert_eq!(classify(text), expected, "{}", text);
        }
    }

    #[test]
    fn test_empty_and_unknown_text_is_warn() {
        assert_eq!(classify(""), Severity::Warn);
        assert_eq!(classify("   "), Severity::Warn);
        assert_eq!(classify("lorem ipsum"), Severity::Warn);
        assert_eq!(classify("¯\\_(ツ)_/¯"), Severity::Warn);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify("OUTAGE"), Severity::Down);
        assert_eq!(classify("DeGrAdEd"), Severity::Warn);
        assert_eq!(classify("OPERATIONAL"), Severity::Ok);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Ok < Severity::Warn);
        assert!(Severity::Warn < Severity::Down);
        assert_eq!(Severity::iter().max(), Some(Severity::Down));
    }

    #[test]
    fn test_state_format() {
        assert_eq!(Severity::Ok.state(200), "🟢 OK (200)");
        assert_eq!(Severity::Warn.state("404"), "🟡 Warning (404)");
        assert!(Severity::Down.state(0).starts_with("🔴"));
    }

    #[test]
    fn test_every_severity_has_a_distinct_tag() {
        let tags: std::collections::HashSet<&str> = Severity::iter().map(|s| s.tag()).collect();
        assert_eq!(tags.len(), 3);
    }
}
