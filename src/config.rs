use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PossoError, Result};
use crate::snapshot::CreditBasis;

// ---------------------------------------------------------------------------
// Rule policy
// ---------------------------------------------------------------------------

/// What the per-category budget is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryLimitBasis {
    /// `max_category_fraction` of total income.
    #[default]
    IncomeFraction,
    /// `max_category_fraction` of total expenses.
    ExpenseFraction,
    /// The flat `category_cap` amount.
    FixedCap,
}

/// Affordability policy knobs. Caller-supplied, never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_min_balance")]
    pub min_balance: Decimal,
    #[serde(default = "default_max_category_fraction")]
    pub max_category_fraction: Decimal,
    #[serde(default = "default_interest_rate")]
    pub interest_rate_per_installment: Decimal,
    #[serde(default = "default_max_installments")]
    pub max_installments: u32,
    #[serde(default = "default_min_installment_value")]
    pub min_installment_value: Decimal,
    #[serde(default)]
    pub category_limit_basis: CategoryLimitBasis,
    #[serde(default)]
    pub category_cap: Option<Decimal>,
}

fn default_min_balance() -> Decimal {
    Decimal::new(500, 0)
}

fn default_max_category_fraction() -> Decimal {
    Decimal::new(3, 1)
}

fn default_interest_rate() -> Decimal {
    Decimal::new(2, 2)
}

fn default_max_installments() -> u32 {
    12
}

fn default_min_installment_value() -> Decimal {
    Decimal::new(50, 0)
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_balance: default_min_balance(),
            max_category_fraction: default_max_category_fraction(),
            interest_rate_per_installment: default_interest_rate(),
            max_installments: default_max_installments(),
            min_installment_value: default_min_installment_value(),
            category_limit_basis: CategoryLimitBasis::default(),
            category_cap: None,
        }
    }
}

impl RuleConfig {
    /// Reject bad policy at configuration time, before any evaluation runs.
    pub fn validate(&self) -> Result<()> {
        if self.min_balance < Decimal::ZERO {
            return Err(PossoError::InvalidRule(
                "min_balance must be zero or positive".to_string(),
            ));
        }
        if self.max_category_fraction <= Decimal::ZERO
            || self.max_category_fraction > Decimal::ONE
        {
            return Err(PossoError::InvalidRule(
                "max_category_fraction must be in (0, 1]".to_string(),
            ));
        }
        if self.interest_rate_per_installment < Decimal::ZERO {
            return Err(PossoError::InvalidRule(
                "interest_rate_per_installment must be zero or positive".to_string(),
            ));
        }
        if self.max_installments < 2 {
            return Err(PossoError::InvalidRule(
                "max_installments must be at least 2".to_string(),
            ));
        }
        if self.min_installment_value <= Decimal::ZERO {
            return Err(PossoError::InvalidRule(
                "min_installment_value must be positive".to_string(),
            ));
        }
        if self.category_limit_basis == CategoryLimitBasis::FixedCap
            && !self.category_cap.is_some_and(|cap| cap > Decimal::ZERO)
        {
            return Err(PossoError::InvalidRule(
                "fixed_cap basis requires a positive category_cap".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Persisted profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub initial_balance: Decimal,
    pub credit_limit: Decimal,
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default)]
    pub credit_basis: CreditBasis,
    #[serde(default)]
    pub rules: RuleConfig,
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("POSSO_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("posso")
}

pub fn profile_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load the profile if one exists. Rule policy is validated here so a bad
/// config fails at load, not halfway through an evaluation.
pub fn load_profile() -> Result<Option<Profile>> {
    let path = profile_path();
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let profile: Profile = serde_json::from_str(&content)
        .map_err(|e| PossoError::Config(format!("{}: {e}", path.display())))?;
    profile.rules.validate()?;
    Ok(Some(profile))
}

pub fn save_profile(profile: &Profile) -> Result<()> {
    profile.rules.validate()?;
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| PossoError::Config(e.to_string()))?;
    std::fs::write(profile_path(), format!("{json}\n"))?;
    Ok(())
}
