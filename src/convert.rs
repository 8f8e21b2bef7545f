// ===============================
// src/convert.rs
// ===============================
//
// Konversi antar token berdasarkan harga spot relatif.
// Tidak ada pembulatan di sini; round_display() hanya untuk tampilan.
//
use serde::{Deserialize, Serialize};

use crate::domain::TokenSymbol;
use crate::prices::PriceTable;

/// Network fee (USD) shown for the from-token.
pub const DEFAULT_NETWORK_FEE_USD: f64 = 1.50;

pub fn convert(amount: f64, from: &str, to: &str, prices: &PriceTable) -> f64 {
    amount * prices.price_or_neutral(from) / prices.price_or_neutral(to)
}

/// Amount of `from` needed to receive `to_amount` of `to`.
pub fn convert_reverse(to_amount: f64, from: &str, to: &str, prices: &PriceTable) -> f64 {
    convert(to_amount, to, from, prices)
}

/// 1 `from` = rate `to`
pub fn exchange_rate(from: &str, to: &str, prices: &PriceTable) -> f64 {
    prices.price_or_neutral(from) / prices.price_or_neutral(to)
}

pub fn round_display(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

pub fn network_fee_usd(token: &str) -> f64 {
    match token {
        "ETH" => 2.50,
        "BTC" => 5.00,
        "SWTH" => 0.50,
        "USDC" | "USDT" => 1.00,
        _ => DEFAULT_NETWORK_FEE_USD,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub from_token: TokenSymbol,
    pub to_token: TokenSymbol,
    pub from_amount: f64,
    pub to_amount: f64,
    pub rate: f64,
    pub network_fee_usd: f64,
}

impl Quote {
    pub fn build(from: &TokenSymbol, to: &TokenSymbol, from_amount: f64, to_amount: f64, prices: &PriceTable) -> Self {
        Self {
            from_token: from.clone(),
            to_token: to.clone(),
            from_amount,
            to_amount,
            rate: exchange_rate(from.as_str(), to.as_str(), prices),
            network_fee_usd: network_fee_usd(from.as_str()),
        }
    }

    /// "1 SWTH = 0.000050 ETH"
    pub fn rate_label(&self) -> String {
        format!("1 {} = {:.6} {}", self.from_token, self.rate, self.to_token)
    }
}
