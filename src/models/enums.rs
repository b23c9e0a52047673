use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Chronic-factor bucket used by the department chronic mix.
    /// Declaration order is the precedence used to pick a patient's single category.
    ChronicCategory {
        Smoking => "smoking",
        Drinking => "drinking",
        Hypertension => "hypertension",
        Diabetes => "diabetes",
        None => "none",
    }
);

impl ChronicCategory {
    /// Categories in precedence order, `None` last.
    pub const ALL: [ChronicCategory; 5] = [
        ChronicCategory::Smoking,
        ChronicCategory::Drinking,
        ChronicCategory::Hypertension,
        ChronicCategory::Diabetes,
        ChronicCategory::None,
    ];
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Merged severity of a patient. Ordering is the upgrade order of the merge.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Normal,
    AtRisk,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AtRisk => "at_risk",
            Self::Critical => "critical",
        }
    }

    /// Whether this level puts the patient in the follow-up cohort.
    pub fn is_elevated(&self) -> bool {
        *self > Self::Normal
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "at_risk" => Ok(Self::AtRisk),
            "critical" => Ok(Self::Critical),
            _ => Err(ModelError::InvalidEnum {
                field: "RiskLevel".into(),
                value: s.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Clearance
// ---------------------------------------------------------------------------

/// Clinician clearance recorded on a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Clearance {
    Normal,
    #[serde(rename = "At Risk")]
    AtRisk,
    Critical,
}

impl Clearance {
    /// Display label, as clinicians author it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::AtRisk => "At Risk",
            Self::Critical => "Critical",
        }
    }

    /// Lenient parse: case-insensitive, accepts space, dash, underscore or no separator.
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "normal" => Some(Self::Normal),
            "atrisk" => Some(Self::AtRisk),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl From<Clearance> for RiskLevel {
    fn from(clearance: Clearance) -> Self {
        match clearance {
            Clearance::Normal => RiskLevel::Normal,
            Clearance::AtRisk => RiskLevel::AtRisk,
            Clearance::Critical => RiskLevel::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn chronic_category_round_trip() {
        for category in ChronicCategory::ALL {
            assert_eq!(ChronicCategory::from_str(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn risk_level_round_trip() {
        for level in [RiskLevel::Normal, RiskLevel::AtRisk, RiskLevel::Critical] {
            assert_eq!(RiskLevel::from_str(level.as_str()).unwrap(), level);
        }
    }

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Normal < RiskLevel::AtRisk);
        assert!(RiskLevel::AtRisk < RiskLevel::Critical);
        assert!(!RiskLevel::Normal.is_elevated());
        assert!(RiskLevel::AtRisk.is_elevated());
    }

    #[test]
    fn clearance_parse_variants() {
        assert_eq!(Clearance::parse("At Risk"), Some(Clearance::AtRisk));
        assert_eq!(Clearance::parse("at_risk"), Some(Clearance::AtRisk));
        assert_eq!(Clearance::parse("AT-RISK"), Some(Clearance::AtRisk));
        assert_eq!(Clearance::parse("AtRisk"), Some(Clearance::AtRisk));
        assert_eq!(Clearance::parse(" critical "), Some(Clearance::Critical));
        assert_eq!(Clearance::parse("Normal"), Some(Clearance::Normal));
        assert_eq!(Clearance::parse("pending"), None);
        assert_eq!(Clearance::parse(""), None);
    }

    #[test]
    fn clearance_maps_to_risk_level() {
        assert_eq!(RiskLevel::from(Clearance::Critical), RiskLevel::Critical);
        assert_eq!(RiskLevel::from(Clearance::AtRisk), RiskLevel::AtRisk);
        assert_eq!(RiskLevel::from(Clearance::Normal), RiskLevel::Normal);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(ChronicCategory::from_str("asthma").is_err());
        assert!(RiskLevel::from_str("AtRisk").is_err());
    }
}
