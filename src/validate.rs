// ===============================
// src/validate.rs
// ===============================
use thiserror::Error;

use crate::balances::BalanceSheet;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be positive")]
    NegativeAmount,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Select different tokens")]
    SameToken,
}

/// Pre-swap check: amount >= 0 dan amount <= saldo (batas inklusif).
pub fn validate_transfer(amount: f64, token: &str, balances: &BalanceSheet) -> Result<(), ValidationError> {
    // NaN juga ditolak di sini
    if amount.is_nan() || amount < 0.0 {
        return Err(ValidationError::NegativeAmount);
    }
    if amount > balances.balance_of(token) {
        return Err(ValidationError::InsufficientBalance);
    }
    Ok(())
}

/// validate_transfer + tolak swap ke token yang sama.
pub fn can_swap(from: &str, to: &str, from_amount: f64, balances: &BalanceSheet) -> Result<(), ValidationError> {
    if from == to {
        return Err(ValidationError::SameToken);
    }
    validate_transfer(from_amount, from, balances)
}

/// Status tombol swap di form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapReadiness {
    EnterAmount,
    InvalidAmount,
    InsufficientBalance,
    SelectDifferentTokens,
    Ready,
}

pub fn swap_readiness(from: &str, to: &str, from_amount: f64, balances: &BalanceSheet) -> SwapReadiness {
    if from_amount == 0.0 || from_amount.is_nan() {
        SwapReadiness::EnterAmount
    } else if from_amount < 0.0 {
        SwapReadiness::InvalidAmount
    } else if from_amount > balances.balance_of(from) {
        SwapReadiness::InsufficientBalance
    } else if from == to {
        SwapReadiness::SelectDifferentTokens
    } else {
        SwapReadiness::Ready
    }
}

impl SwapReadiness {
    pub fn is_enabled(&self) -> bool { matches!(self, SwapReadiness::Ready) }

    pub fn label(&self, from: &str, to: &str) -> String {
        match self {
            SwapReadiness::EnterAmount => "Enter an amount".to_string(),
            SwapReadiness::InvalidAmount => "Amount must be positive".to_string(),
            SwapReadiness::InsufficientBalance => "Insufficient balance".to_string(),
            SwapReadiness::SelectDifferentTokens => "Select different tokens".to_string(),
            SwapReadiness::Ready => format!("Swap {from} for {to}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenSymbol;

    fn sheet(pairs: &[(&str, f64)]) -> BalanceSheet {
        BalanceSheet::from_pairs(pairs.iter().map(|(s, q)| (TokenSymbol::new(*s).unwrap(), *q)))
    }

    #[test]
    fn negative_always_rejected() {
        for b in [sheet(&[]), sheet(&[("X", 0.0)]), sheet(&[("X", 1e9)])] {
            assert_eq!(validate_transfer(-1.0, "X", &b), Err(ValidationError::NegativeAmount));
        }
        assert_eq!(validate_transfer(f64::NAN, "X", &sheet(&[("X", 1.0)])), Err(ValidationError::NegativeAmount));
    }

    #[test]
    fn balance_boundary_is_inclusive() {
        let b = sheet(&[("X", 250.0)]);
        assert_eq!(validate_transfer(250.0, "X", &b), Ok(()));
        assert_eq!(validate_transfer(251.0, "X", &b), Err(ValidationError::InsufficientBalance));
        assert_eq!(validate_transfer(0.0, "X", &b), Ok(()));
    }

    #[test]
    fn missing_token_is_zero_balance() {
        let b = sheet(&[]);
        assert_eq!(validate_transfer(0.0, "Y", &b), Ok(()));
        assert_eq!(validate_transfer(0.1, "Y", &b), Err(ValidationError::InsufficientBalance));
    }

    #[test]
    fn can_swap_rejects_same_token_first() {
        let b = sheet(&[("ETH", 1.0)]);
        assert_eq!(can_swap("ETH", "ETH", 0.5, &b), Err(ValidationError::SameToken));
        assert_eq!(can_swap("ETH", "ETH", 50.0, &b), Err(ValidationError::SameToken));
        assert_eq!(can_swap("ETH", "BTC", 50.0, &b), Err(ValidationError::InsufficientBalance));
        assert_eq!(can_swap("ETH", "BTC", 0.5, &b), Ok(()));
    }

    #[test]
    fn readiness_order_and_labels() {
        let b = sheet(&[("SWTH", 10.0)]);
        assert_eq!(swap_readiness("SWTH", "ETH", 0.0, &b), SwapReadiness::EnterAmount);
        assert_eq!(swap_readiness("SWTH", "SWTH", 20.0, &b), SwapReadiness::InsufficientBalance);
        assert_eq!(swap_readiness("SWTH", "SWTH", 5.0, &b), SwapReadiness::SelectDifferentTokens);
        let r = swap_readiness("SWTH", "ETH", 5.0, &b);
        assert!(r.is_enabled());
        assert_eq!(r.label("SWTH", "ETH"), "Swap SWTH for ETH");
    }

    #[test]
    fn negative_amount_keeps_button_disabled() {
        let b = sheet(&[("SWTH", 10.0)]);
        let r = swap_readiness("SWTH", "ETH", -5.0, &b);
        assert_eq!(r, SwapReadiness::InvalidAmount);
        assert!(!r.is_enabled());
        assert_eq!(r.label("SWTH", "ETH"), "Amount must be positive");
        assert_eq!(can_swap("SWTH", "ETH", -5.0, &b), Err(ValidationError::NegativeAmount));
    }

    #[test]
    fn ready_implies_can_swap() {
        let b = sheet(&[("SWTH", 10.0), ("ETH", 1.0)]);
        for amount in [-1.0, 0.0, 0.5, 10.0, 10.5, f64::NAN] {
            for (from, to) in [("SWTH", "ETH"), ("ETH", "ETH"), ("ETH", "SWTH")] {
                if swap_readiness(from, to, amount, &b).is_enabled() {
                    assert_eq!(can_swap(from, to, amount, &b), Ok(()), "{from}->{to} {amount}");
                }
            }
        }
    }
}
