// ===============================
// src/tokens.rs (katalog token)
// ===============================
use serde::Serialize;

const ICON_BASE: &str = "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo { pub symbol: &'static str, pub name: &'static str }

impl TokenInfo {
    pub fn icon_url(&self) -> String { format!("{ICON_BASE}/{}.svg", self.symbol) }
}

pub static CATALOG: [TokenInfo; 10] = [
    TokenInfo { symbol: "SWTH", name: "Switcheo Token" },
    TokenInfo { symbol: "ETH", name: "Ethereum" },
    TokenInfo { symbol: "BTC", name: "Bitcoin" },
    TokenInfo { symbol: "USDC", name: "USD Coin" },
    TokenInfo { symbol: "USDT", name: "Tether" },
    TokenInfo { symbol: "SOL", name: "Solana" },
    TokenInfo { symbol: "ADA", name: "Cardano" },
    TokenInfo { symbol: "DOT", name: "Polkadot" },
    TokenInfo { symbol: "LINK", name: "Chainlink" },
    TokenInfo { symbol: "UNI", name: "Uniswap" },
];

pub fn find(symbol: &str) -> Option<&'static TokenInfo> {
    CATALOG.iter().find(|t| t.symbol == symbol)
}

/// Case-insensitive substring match on symbol or name. Empty term -> semua.
pub fn search(term: &str) -> Vec<&'static TokenInfo> {
    let term = term.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|t| t.symbol.to_lowercase().contains(&term) || t.name.to_lowercase().contains(&term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_symbol_or_name() {
        let syms = |v: Vec<&TokenInfo>| v.iter().map(|t| t.symbol).collect::<Vec<_>>();
        assert_eq!(syms(search("usd")), ["USDC", "USDT"]);
        assert_eq!(syms(search("COIN")), ["BTC", "USDC"]);
        assert_eq!(search("").len(), 10);
        assert!(search("doge").is_empty());
    }

    #[test]
    fn find_and_icon() {
        let eth = find("ETH").unwrap();
        assert_eq!(eth.name, "Ethereum");
        assert!(eth.icon_url().ends_with("/tokens/ETH.svg"));
        assert!(find("eth").is_none());
    }
}
