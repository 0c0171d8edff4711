//! Disorder Registry
//!
//! Static table: class index → (name, text, severity band).
//! Lookups never fail; an index the table does not know maps to `UNKNOWN`
//! so display code always has something to render.

use serde::{Deserialize, Serialize};

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity band, monotonically increasing with the class index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    /// Only carried by the `UNKNOWN` record
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }

    /// Parse a filter value. "normal" is accepted as an alias of "low".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "normal" => Some(Severity::Low),
            "moderate" => Some(Severity::Moderate),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            "unknown" => Some(Severity::Unknown),
            _ => None,
        }
    }

    /// High and Critical cases are flagged as urgent for administrators
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DISORDER CLASSES
// ============================================================================

/// Classifier output classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Disorder {
    Normal,
    SleepDeprivation,
    ChronicInsomnia,
    SleepApnea,
}

/// Number of classes the classifier can emit
pub const CLASS_COUNT: usize = 4;

impl Disorder {
    pub const ALL: [Disorder; CLASS_COUNT] = [
        Disorder::Normal,
        Disorder::SleepDeprivation,
        Disorder::ChronicInsomnia,
        Disorder::SleepApnea,
    ];

    pub fn index(&self) -> usize {
        match self {
            Disorder::Normal => 0,
            Disorder::SleepDeprivation => 1,
            Disorder::ChronicInsomnia => 2,
            Disorder::SleepApnea => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn record(&self) -> &'static DisorderRecord {
        &DISORDERS[self.index()]
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// Display record for one class index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisorderRecord {
    /// `None` only for the `UNKNOWN` record
    pub index: Option<usize>,
    pub name: &'static str,
    pub text: &'static str,
    pub severity: Severity,
    pub color: &'static str,
}

pub static DISORDERS: [DisorderRecord; CLASS_COUNT] = [
    DisorderRecord {
        index: Some(0),
        name: "Normal",
        text: "No sleep disorder detected",
        severity: Severity::Low,
        color: "green",
    },
    DisorderRecord {
        index: Some(1),
        name: "Sleep Deprivation",
        text: "Moderate Risk: Sleep Deprivation",
        severity: Severity::Moderate,
        color: "orange",
    },
    DisorderRecord {
        index: Some(2),
        name: "Chronic Insomnia",
        text: "High Risk: Chronic Insomnia",
        severity: Severity::High,
        color: "red",
    },
    DisorderRecord {
        index: Some(3),
        name: "Sleep Apnea",
        text: "Critical Risk: Possible Sleep Apnea",
        severity: Severity::Critical,
        color: "darkred",
    },
];

pub static UNKNOWN: DisorderRecord = DisorderRecord {
    index: None,
    name: "Unknown",
    text: "Unknown",
    severity: Severity::Unknown,
    color: "gray",
};

/// Look up the display record for a class index
pub fn lookup(index: usize) -> &'static DisorderRecord {
    DISORDERS.get(index).unwrap_or(&UNKNOWN)
}

/// Look up by a signed index as stored in databases
pub fn lookup_signed(index: i64) -> &'static DisorderRecord {
    usize::try_from(index).map(lookup).unwrap_or(&UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_classes() {
        assert_eq!(lookup(0).name, "Normal");
        assert_eq!(lookup(0).severity, Severity::Low);
        assert_eq!(lookup(1).severity, Severity::Moderate);
        assert_eq!(lookup(2).name, "Chronic Insomnia");
        assert_eq!(lookup(3).severity, Severity::Critical);
        assert_eq!(lookup(3).text, "Critical Risk: Possible Sleep Apnea");
    }

    #[test]
    fn test_out_of_range_index_is_unknown() {
        let record = lookup(99);
        assert_eq!(record, &UNKNOWN);
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.index, None);
        assert_eq!(lookup_signed(-1), &UNKNOWN);
        assert_eq!(lookup_signed(2).name, "Chronic Insomnia");
    }

    #[test]
    fn test_severity_increases_with_index() {
        let severities: Vec<Severity> = DISORDERS.iter().map(|d| d.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort();
        assert_eq!(severities, sorted);
    }

    #[test]
    fn test_disorder_index_round_trip() {
        for disorder in Disorder::ALL {
            assert_eq!(Disorder::from_index(disorder.index()), Some(disorder));
            assert_eq!(disorder.record().index, Some(disorder.index()));
        }
        assert_eq!(Disorder::from_index(4), None);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("Critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("normal"), Some(Severity::Low));
        assert_eq!(Severity::parse("all"), None);
        assert!(Severity::High.is_urgent());
        assert!(!Severity::Moderate.is_urgent());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Moderate).unwrap(), "\"moderate\"");
    }
}
