use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::RuleConfig;

/// A proposed split of a purchase into N payments with accrued interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentPlan {
    pub count: u32,
    pub per_installment_amount: Decimal,
}

impl InstallmentPlan {
    pub fn total(&self) -> Decimal {
        self.per_installment_amount * Decimal::from(self.count)
    }
}

/// Search for the cheapest feasible plan: interest compounds per
/// installment, so the scan runs ascending and returns the first count that
/// fits. Feasible means each installment stays within an equal share of the
/// available credit and above the configured floor.
pub fn plan(
    amount: Decimal,
    available_credit: Decimal,
    config: &RuleConfig,
) -> Option<InstallmentPlan> {
    if available_credit <= Decimal::ZERO {
        return None;
    }

    let factor = Decimal::ONE + config.interest_rate_per_installment;
    let mut gross = amount * factor;
    for count in 2..=config.max_installments {
        gross *= factor;
        let per_installment = gross / Decimal::from(count);
        if per_installment <= available_credit / Decimal::from(count)
            && per_installment >= config.min_installment_value
        {
            return Some(InstallmentPlan {
                count,
                per_installment_amount: per_installment,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_smallest_feasible_count_wins() {
        // 800 at 2% over two installments: 800 * 1.02^2 = 832.32, so
        // 416.16 each, within 900 / 2 = 450. n=2 beats the also-feasible
        // n=3 (282.9888 each).
        let result = plan(dec!(800), dec!(900), &RuleConfig::default());
        assert_eq!(
            result,
            Some(InstallmentPlan {
                count: 2,
                per_installment_amount: dec!(416.16),
            })
        );
    }

    #[test]
    fn test_scan_falls_through_to_first_feasible_count() {
        // At 100% interest per installment the per-installment amount grows
        // with n (10 * 2^n / n), so the 50 floor is first cleared at n=5.
        let mut config = RuleConfig::default();
        config.interest_rate_per_installment = dec!(1);
        config.min_installment_value = dec!(50);
        let result = plan(dec!(10), dec!(1000), &config).unwrap();
        assert_eq!(result.count, 5);
        assert_eq!(result.per_installment_amount, dec!(64));
    }

    #[test]
    fn test_respects_max_installments() {
        // Same request as above, but the scan is capped before n=5.
        let mut config = RuleConfig::default();
        config.interest_rate_per_installment = dec!(1);
        config.min_installment_value = dec!(50);
        config.max_installments = 4;
        assert_eq!(plan(dec!(10), dec!(1000), &config), None);
    }

    #[test]
    fn test_floor_excludes_all_counts() {
        // 416.16 at n=2 already misses a 420 floor, and at 2% the
        // per-installment amount only shrinks from there.
        let mut config = RuleConfig::default();
        config.min_installment_value = dec!(420);
        assert_eq!(plan(dec!(800), dec!(1800), &config), None);
    }

    #[test]
    fn test_gross_over_credit_is_never_feasible() {
        // gross = amount * 1.02^n only grows; once above the available
        // credit it stays above for every n.
        assert_eq!(plan(dec!(1000), dec!(900), &RuleConfig::default()), None);
    }

    #[test]
    fn test_zero_available_credit_skips() {
        assert_eq!(plan(dec!(100), dec!(0), &RuleConfig::default()), None);
        assert_eq!(plan(dec!(100), dec!(-50), &RuleConfig::default()), None);
    }

    #[test]
    fn test_zero_interest_plan() {
        let mut config = RuleConfig::default();
        config.interest_rate_per_installment = dec!(0);
        let result = plan(dec!(600), dec!(600), &config).unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.per_installment_amount, dec!(300));
        assert_eq!(result.total(), dec!(600));
    }
}
