//! The closed set of app-allocation policy labels (spec.md §6).
use crate::error::RouterError;

const LEGAL_VALUES: &[&str] = &["random", "spf", "bestfit", "randomfeas", "spffeas", "bestfitfeas"];

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Policy {
    Random,
    ShortestPath,
    LoadBalancing,
    RandomFeas,
    SpfFeas,
    BestfitFeas,
}

impl Policy {
    /// Parses a case-sensitive lowercase label. Unknown labels fail with
    /// `InvalidArgument` carrying a diagnostic listing the legal values.
    pub fn parse(label: &str) -> Result<Policy, RouterError> {
        use Policy::*;
        match label {
            "random" => Ok(Random),
            "spf" => Ok(ShortestPath),
            "bestfit" => Ok(LoadBalancing),
            "randomfeas" => Ok(RandomFeas),
            "spffeas" => Ok(SpfFeas),
            "bestfitfeas" => Ok(BestfitFeas),
            other => Err(RouterError::InvalidArgument(format!(
                "unknown policy label '{}', expected one of: {}",
                other,
                LEGAL_VALUES.join(", ")
            ))),
        }
    }

    /// `*Feas` variants are their base policy restricted to peers with at
    /// least one feasible cached path (spec.md §9(c)); this reports which
    /// base policy a label maps to.
    pub fn base(&self) -> Policy {
        use Policy::*;
        match self {
            Random | RandomFeas => Random,
            ShortestPath | SpfFeas => ShortestPath,
            LoadBalancing | BestfitFeas => LoadBalancing,
        }
    }

    /// Whether this label restricts to feasible-only peers before selection.
    pub fn is_feas_restricted(&self) -> bool {
        use Policy::*;
        matches!(self, RandomFeas | SpfFeas | BestfitFeas)
    }
}
