//! Temporal semantics of a gridded quantity.

use serde::{Deserialize, Serialize};

/// How the values of a grid relate to the time interval they are valid for.
///
/// The data type decides both which interval index is built over a record
/// sequence and which reconstruction rule answers a window query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Sampled at a single instant (temperature, snow depth).
    Instantaneous,
    /// Summed over the valid interval (precipitation depth).
    Accumulation,
    /// Averaged over the valid interval (mean air temperature).
    Average,
    /// Anything else. Queries against undefined data always come back empty.
    #[default]
    Undefined,
}

impl DataType {
    /// Parse from string (case-insensitive).
    ///
    /// Accepts canonical names plus the short forms used by common
    /// time-series stores. Unknown strings map to `Undefined`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "instantaneous" | "inst" | "inst-val" => Self::Instantaneous,
            "accumulation" | "accum" | "per-cum" => Self::Accumulation,
            "average" | "avg" | "per-aver" => Self::Average,
            _ => Self::Undefined,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instantaneous => "instantaneous",
            Self::Accumulation => "accumulation",
            Self::Average => "average",
            Self::Undefined => "undefined",
        }
    }

    /// True for quantities defined over a period (accumulation, average).
    pub fn is_period(&self) -> bool {
        matches!(self, Self::Accumulation | Self::Average)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_from_str() {
        assert_eq!(DataType::from_str("INST-VAL"), DataType::Instantaneous);
        assert_eq!(DataType::from_str("per-cum"), DataType::Accumulation);
        assert_eq!(DataType::from_str("Average"), DataType::Average);
        assert_eq!(DataType::from_str("avg"), DataType::Average);
        assert_eq!(DataType::from_str("bogus"), DataType::Undefined);
    }

    #[test]
    fn test_data_type_is_period() {
        assert!(DataType::Accumulation.is_period());
        assert!(DataType::Average.is_period());
        assert!(!DataType::Instantaneous.is_period());
        assert!(!DataType::Undefined.is_period());
    }

    #[test]
    fn test_data_type_display_round_trip() {
        for dt in [
            DataType::Instantaneous,
            DataType::Accumulation,
            DataType::Average,
            DataType::Undefined,
        ] {
            assert_eq!(DataType::from_str(&dt.to_string()), dt);
        }
    }
}
