// ===============================
// src/domain.rs
// ===============================
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("token symbol must not be empty")]
    Empty,
}

/// Token key (case-sensitive, non-empty). "ETH" != "eth".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenSymbol(String);

impl TokenSymbol {
    pub fn new(s: impl Into<String>) -> Result<Self, SymbolError> {
        let s = s.into();
        if s.is_empty() {
            return Err(SymbolError::Empty);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for TokenSymbol {
    type Error = SymbolError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Self::new(s) }
}

impl From<TokenSymbol> for String {
    fn from(t: TokenSymbol) -> Self { t.0 }
}

impl Borrow<str> for TokenSymbol {
    fn borrow(&self) -> &str { &self.0 }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest { pub from_token: TokenSymbol, pub to_token: TokenSymbol, pub from_amount: f64 }

impl SwapRequest {
    pub fn new(from_token: TokenSymbol, to_token: TokenSymbol, from_amount: f64) -> Self {
        Self { from_token, to_token, from_amount }
    }

    /// Tukar arah (from <-> to), amount tetap.
    pub fn flipped(&self) -> Self {
        Self { from_token: self.to_token.clone(), to_token: self.from_token.clone(), from_amount: self.from_amount }
    }
}

/// Sisi amount pada order: jumlah yang dijual, jumlah yang ingin diterima, atau seluruh saldo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountSpec { Sell(f64), Receive(f64), Max }

/// Order dari CLI/ENV, di-resolve engine menjadi SwapRequest.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOrder {
    pub from_token: TokenSymbol,
    pub to_token: TokenSymbol,
    pub amount: AmountSpec,
    /// Tombol arah ditekan sebelum swap (from <-> to).
    pub flip: bool,
}

impl SwapOrder {
    /// Pasangan token efektif setelah flip.
    pub fn pair(&self) -> SwapRequest {
        let base = SwapRequest::new(self.from_token.clone(), self.to_token.clone(), 0.0);
        if self.flip { base.flipped() } else { base }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RequestParseError {
    #[error("expected FROM:TO:AMOUNT[:flip], got {0:?}")]
    Shape(String),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error("bad amount {0:?}")]
    Amount(String),
}

fn parse_amount(raw: &str) -> Result<AmountSpec, RequestParseError> {
    let bad = || RequestParseError::Amount(raw.to_string());
    if raw.eq_ignore_ascii_case("max") {
        return Ok(AmountSpec::Max);
    }
    match raw.strip_prefix("to=") {
        Some(rest) => rest.trim().parse::<f64>().map(AmountSpec::Receive).map_err(|_| bad()),
        None => raw.parse::<f64>().map(AmountSpec::Sell).map_err(|_| bad()),
    }
}

// CLI form: "SWTH:ETH:100", "SWTH:ETH:max", "SWTH:ETH:to=0.005", "SWTH:ETH:1:flip"
impl FromStr for SwapOrder {
    type Err = RequestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').map(|p| p.trim()).collect();
        let (from, to, amount, flip) = match parts.as_slice() {
            [from, to, amount] => (*from, *to, *amount, false),
            [from, to, amount, "flip"] => (*from, *to, *amount, true),
            _ => return Err(RequestParseError::Shape(s.to_string())),
        };
        Ok(Self {
            from_token: TokenSymbol::new(from)?,
            to_token: TokenSymbol::new(to)?,
            amount: parse_amount(amount)?,
            flip,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus { Success, Failed }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub id: String,
    pub from_token: TokenSymbol,
    pub from_amount: f64,
    pub to_token: TokenSymbol,
    pub to_amount: f64,
    pub status: SwapStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry { pub symbol: TokenSymbol, pub price: f64 }

// Recorder events (JSONL)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event { Prices { source: String, table: Vec<PriceEntry> }, Swap(SwapRecord) }
