// ===============================
// src/balances.rs (saldo per token)
// ===============================
use ahash::AHashMap as HashMap;

use crate::domain::TokenSymbol;
use crate::metrics::BALANCE;

/// Saldo awal sesi (simulasi, tidak persisten).
pub const STARTING_BALANCES: [(&str, f64); 10] = [
    ("SWTH", 1000.0),
    ("ETH", 5.0),
    ("BTC", 0.1),
    ("USDC", 5000.0),
    ("USDT", 3000.0),
    ("SOL", 50.0),
    ("ADA", 2000.0),
    ("DOT", 100.0),
    ("LINK", 200.0),
    ("UNI", 100.0),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSheet {
    balances: HashMap<TokenSymbol, f64>,
}

impl BalanceSheet {
    pub fn starting() -> Self {
        let mut b = Self::default();
        for (sym, qty) in STARTING_BALANCES {
            if let Ok(s) = TokenSymbol::new(sym) {
                b.balances.insert(s, qty);
            }
        }
        b
    }

    /// Build from explicit pairs; negative/non-finite values are clamped to 0.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TokenSymbol, f64)>,
    {
        let balances = pairs
            .into_iter()
            .map(|(s, q)| (s, if q.is_finite() && q > 0.0 { q } else { 0.0 }))
            .collect();
        Self { balances }
    }

    /// Token tanpa entry = saldo 0.
    pub fn balance_of(&self, token: &str) -> f64 { self.balances.get(token).copied().unwrap_or(0.0) }

    /// Pindahkan saldo: debit `from`, credit `to`. Caller sudah memvalidasi debit.
    pub(crate) fn transfer(&mut self, from: &TokenSymbol, debit: f64, to: &TokenSymbol, credit: f64) {
        let f = self.balances.entry(from.clone()).or_insert(0.0);
        *f = (*f - debit).max(0.0);
        *self.balances.entry(to.clone()).or_insert(0.0) += credit;
    }

    pub fn entries(&self) -> Vec<(TokenSymbol, f64)> {
        let mut v: Vec<(TokenSymbol, f64)> = self.balances.iter().map(|(s, q)| (s.clone(), *q)).collect();
        v.sort_by(|a, b| a.0.cmp(&b.0));
        v
    }

    pub fn export_metrics(&self) {
        for (s, q) in self.balances.iter() {
            BALANCE.with_label_values(&[s.as_str()]).set(*q);
        }
    }
}
