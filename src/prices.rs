// ===============================
// src/prices.rs
// ===============================
//
// Price table loader:
// - load_prices   : default table (10 token) + overlay remote entries yang valid
// - fetch_prices  : HTTP GET dengan batas waktu; gagal apa pun -> default table
//
// Remote format: [{"currency":"ETH","price":"2500"}, {"currency":"BTC","price":40000.5}, ...]
// `price` boleh number atau numeric string.
//
use ahash::AHashMap as HashMap;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{PriceEntry, TokenSymbol};
use crate::metrics::PRICE_LOADS;

/// Harga default (USD) bila sumber remote tidak tersedia.
pub const DEFAULT_PRICES: [(&str, f64); 10] = [
    ("SWTH", 0.1),
    ("ETH", 2000.0),
    ("BTC", 40000.0),
    ("USDC", 1.0),
    ("USDT", 1.0),
    ("SOL", 100.0),
    ("ADA", 0.5),
    ("DOT", 10.0),
    ("LINK", 15.0),
    ("UNI", 20.0),
];

/// Price substituted for a token missing from the table.
pub const NEUTRAL_PRICE: f64 = 1.0;

pub const DEFAULT_PRICE_URL: &str = "https://interview.switcheo.com/prices.json";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: HashMap<TokenSymbol, f64>,
}

impl PriceTable {
    pub fn defaults() -> Self {
        let mut t = Self::default();
        for (sym, px) in DEFAULT_PRICES {
            if let Ok(s) = TokenSymbol::new(sym) {
                t.set(s, px);
            }
        }
        t
    }

    /// Insert/overwrite a price. Zero, negative and non-finite prices are refused.
    pub fn set(&mut self, symbol: TokenSymbol, price: f64) -> bool {
        if !price.is_finite() || price <= 0.0 {
            return false;
        }
        self.prices.insert(symbol, price);
        true
    }

    pub fn get(&self, symbol: &str) -> Option<f64> { self.prices.get(symbol).copied() }

    pub fn price_or_neutral(&self, symbol: &str) -> f64 { self.get(symbol).unwrap_or(NEUTRAL_PRICE) }

    pub fn len(&self) -> usize { self.prices.len() }

    /// Sorted by symbol, stable output for logs/recorder.
    pub fn entries(&self) -> Vec<PriceEntry> {
        let mut v: Vec<PriceEntry> = self
            .prices
            .iter()
            .map(|(s, p)| PriceEntry { symbol: s.clone(), price: *p })
            .collect();
        v.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        v
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice { Num(f64), Text(String) }

impl RawPrice {
    fn parse(&self) -> Option<f64> {
        match self {
            RawPrice::Num(x) => Some(*x),
            RawPrice::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemotePrice {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
}

/// Default table + overlay remote entries (urutan list; entry terakhir menang).
pub fn load_prices(remote: Option<&[RemotePrice]>) -> PriceTable {
    let mut table = PriceTable::defaults();
    let Some(items) = remote else { return table };

    let mut skipped = 0usize;
    for item in items {
        let symbol = item.currency.clone().and_then(|c| TokenSymbol::new(c).ok());
        let price = item.price.as_ref().and_then(RawPrice::parse);
        let accepted = match (symbol, price) {
            (Some(s), Some(px)) => table.set(s, px),
            _ => false,
        };
        if !accepted {
            skipped += 1;
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "price entries ignored");
    }
    table
}

#[derive(Debug, Error)]
pub enum PriceFetchError {
    #[error("price fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Status(reqwest::StatusCode),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource { Remote, Default }

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Remote => "remote",
            PriceSource::Default => "default",
        }
    }
}

async fn fetch_remote(http: &reqwest::Client, url: &str) -> Result<Vec<RemotePrice>, PriceFetchError> {
    let rsp = http.get(url).send().await?;
    if !rsp.status().is_success() {
        return Err(PriceFetchError::Status(rsp.status()));
    }
    let body = rsp.bytes().await?;
    // Entry yang bentuknya aneh di-skip, bukan menggagalkan seluruh list
    let raw: Vec<serde_json::Value> = serde_json::from_slice(&body)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| serde_json::from_value::<RemotePrice>(v).ok())
        .collect())
}

/// Fetch + merge. Tidak pernah gagal: timeout/error -> default table.
pub async fn fetch_prices(http: &reqwest::Client, url: &str, timeout: Duration) -> (PriceTable, PriceSource) {
    let res = match tokio::time::timeout(timeout, fetch_remote(http, url)).await {
        Ok(r) => r,
        Err(_) => Err(PriceFetchError::Timeout(timeout)),
    };

    let (table, source) = match res {
        Ok(items) => {
            info!(%url, entries = items.len(), "prices loaded");
            (load_prices(Some(items.as_slice())), PriceSource::Remote)
        }
        Err(e) => {
            warn!(error = %e, %url, "error loading prices, using defaults");
            (PriceTable::defaults(), PriceSource::Default)
        }
    };
    PRICE_LOADS.with_label_values(&[source.as_str()]).inc();
    (table, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn remote(json: &str) -> Vec<RemotePrice> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn no_remote_gives_exact_defaults() {
        let t = load_prices(None);
        assert_eq!(t.len(), 10);
        for (sym, px) in DEFAULT_PRICES {
            assert_eq!(t.get(sym), Some(px));
        }
    }

    #[test]
    fn numeric_string_overrides_single_entry() {
        let items = remote(r#"[{"currency":"ETH","price":"2500"}]"#);
        let t = load_prices(Some(items.as_slice()));
        assert_eq!(t.get("ETH"), Some(2500.0));
        assert_eq!(t.len(), 10);
        for (sym, px) in DEFAULT_PRICES.iter().filter(|(s, _)| *s != "ETH") {
            assert_eq!(t.get(sym), Some(*px));
        }
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let items = remote(
            r#"[
                {"currency":"BTC","price":"not-a-number"},
                {"price":"3"},
                {"currency":"","price":5},
                {"currency":"SOL"},
                {"currency":"ADA","price":0},
                {"currency":"DOT","price":"-4"},
                {"currency":"LINK","price":16.5}
            ]"#,
        );
        let t = load_prices(Some(items.as_slice()));
        assert_eq!(t.get("BTC"), Some(40000.0));
        assert_eq!(t.get("SOL"), Some(100.0));
        assert_eq!(t.get("ADA"), Some(0.5));
        assert_eq!(t.get("DOT"), Some(10.0));
        assert_eq!(t.get("LINK"), Some(16.5));
        assert_eq!(t.len(), 10);
    }

    #[test]
    fn unknown_symbols_are_added_and_last_duplicate_wins() {
        let items = remote(
            r#"[{"currency":"ATOM","price":"7.5"},{"currency":"ETH","price":1},{"currency":"ETH","price":"1800"}]"#,
        );
        let t = load_prices(Some(items.as_slice()));
        assert_eq!(t.get("ATOM"), Some(7.5));
        assert_eq!(t.get("ETH"), Some(1800.0));
        assert_eq!(t.len(), 11);
    }

    #[test]
    fn missing_symbol_uses_neutral_price() {
        let t = PriceTable::defaults();
        assert_eq!(t.price_or_neutral("NOPE"), NEUTRAL_PRICE);
        assert_eq!(t.price_or_neutral("eth"), NEUTRAL_PRICE);
    }

    // Satu koneksi, balas `response` mentah lalu tutup.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = sock.read(&mut buf).await;
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        format!("http://{addr}/prices.json")
    }

    #[tokio::test]
    async fn fetch_merges_remote_body() {
        let body = r#"[{"currency":"ETH","price":"2500"},{"currency":"SWTH","price":0.2}]"#;
        let resp: &'static str = Box::leak(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .into_boxed_str(),
        );
        let url = serve_once(resp).await;
        let (t, src) = fetch_prices(&reqwest::Client::new(), &url, Duration::from_secs(2)).await;
        assert_eq!(src, PriceSource::Remote);
        assert_eq!(t.get("ETH"), Some(2500.0));
        assert_eq!(t.get("SWTH"), Some(0.2));
        assert_eq!(t.get("BTC"), Some(40000.0));
    }

    #[tokio::test]
    async fn fetch_non_2xx_falls_back() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let (t, src) = fetch_prices(&reqwest::Client::new(), &url, Duration::from_secs(2)).await;
        assert_eq!(src, PriceSource::Default);
        assert_eq!(t, PriceTable::defaults());
    }

    #[tokio::test]
    async fn fetch_bad_json_falls_back() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json").await;
        let (t, src) = fetch_prices(&reqwest::Client::new(), &url, Duration::from_secs(2)).await;
        assert_eq!(src, PriceSource::Default);
        assert_eq!(t.len(), 10);
    }

    #[tokio::test]
    async fn fetch_timeout_falls_back() {
        // Terima koneksi tapi tidak pernah membalas
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((sock, _)) = listener.accept().await {
                held.push(sock);
            }
        });
        let url = format!("http://{addr}/prices.json");
        let (t, src) = fetch_prices(&reqwest::Client::new(), &url, Duration::from_millis(200)).await;
        assert_eq!(src, PriceSource::Default);
        assert_eq!(t, PriceTable::defaults());
    }
}
