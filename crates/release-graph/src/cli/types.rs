//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::RiskPolicy;

/// Risk policy for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskPolicyArg {
    /// Take conditional edges only when no safe path exists
    PreferSafe,
    /// Weigh conditional and unconditional edges the same
    Uniform,
}

impl std::fmt::Display for RiskPolicyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", RiskPolicy::from(*self))
    }
}

impl From<RiskPolicyArg> for RiskPolicy {
    fn from(arg: RiskPolicyArg) -> Self {
        match arg {
            RiskPolicyArg::PreferSafe => RiskPolicy::PreferSafe,
            RiskPolicyArg::Uniform => RiskPolicy::Uniform,
        }
    }
}
