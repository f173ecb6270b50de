use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Navigation (operating) mode. It selects which column of the
/// message time out table applies.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavigationMode {
    /// Precision Approach (PA): stringent time outs.
    PrecisionApproach,

    /// En route, terminal and Non Precision Approach (NPA) operations.
    #[default]
    NonPrecisionApproach,
}

impl NavigationMode {
    /// True for [NavigationMode::PrecisionApproach]
    pub fn is_precision_approach(&self) -> bool {
        matches!(self, Self::PrecisionApproach)
    }
}

impl std::fmt::Display for NavigationMode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::PrecisionApproach => write!(fmt, "PA"),
            Self::NonPrecisionApproach => write!(fmt, "NPA"),
        }
    }
}

impl std::str::FromStr for NavigationMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pa" | "precision" | "precision-approach" => Ok(Self::PrecisionApproach),
            "npa" | "non-precision" | "non-precision-approach" => {
                Ok(Self::NonPrecisionApproach)
            },
            _ => Err(Error::UnknownNavigationMode),
        }
    }
}
