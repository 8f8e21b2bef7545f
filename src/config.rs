// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : swap_sim_rust — single-session token swap simulator in Rust
Module  : config.rs
Version : 0.5.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
License : MIT (see LICENSE)

Summary : Loads spot prices (remote JSON with timeout, default fallback),
          quotes conversions, validates balances, applies simulated swaps
          with bounded history, exposes Prometheus metrics, and records
          JSONL events.
=============================================================================
*/
use clap::Parser;
use dotenvy::dotenv;
use tokio::time::Duration;

use crate::domain::SwapOrder;
use crate::engine::{EngineCfg, DEFAULT_SWAP_DELAY};
use crate::history::DEFAULT_HISTORY_CAP;
use crate::prices::{DEFAULT_FETCH_TIMEOUT, DEFAULT_PRICE_URL};

/// Semua opsi bisa lewat CLI atau ENV (.env ikut dibaca).
#[derive(Clone, Debug, Parser)]
#[command(name = "swap_sim_rust", version, about = "Token swap simulator")]
pub struct Args {
    // price source
    #[arg(long, env = "PRICE_URL", default_value = DEFAULT_PRICE_URL)]
    pub price_url: String,
    #[arg(long, env = "PRICE_TIMEOUT_MS", default_value_t = DEFAULT_FETCH_TIMEOUT.as_millis() as u64)]
    pub price_timeout_ms: u64,

    // engine
    #[arg(long, env = "SWAP_DELAY_MS", default_value_t = DEFAULT_SWAP_DELAY.as_millis() as u64)]
    pub swap_delay_ms: u64,
    #[arg(long, env = "HISTORY_CAP", default_value_t = DEFAULT_HISTORY_CAP)]
    pub history_cap: usize,

    // files/metrics
    #[arg(long, env = "RECORD_FILE")]
    pub record_file: Option<String>,
    /// 0 = metrics server off
    #[arg(long, env = "METRICS_PORT", default_value_t = 9898)]
    pub metrics_port: u16,

    /// Filter katalog token yang dicetak saat startup (symbol/nama)
    #[arg(long, env = "TOKEN_FILTER", default_value = "")]
    pub token_filter: String,

    /// Swap yang dijalankan berurutan, format FROM:TO:AMOUNT[:flip]
    /// AMOUNT = jumlah jual | max (seluruh saldo) | to=N (jumlah yang ingin diterima)
    /// (contoh: SWAPS=SWTH:ETH:100,ETH:BTC:max,USDC:SWTH:to=50:flip)
    #[arg(long = "swap", env = "SWAPS", value_delimiter = ',')]
    pub swaps: Vec<SwapOrder>,
}

impl Args {
    pub fn price_timeout(&self) -> Duration { Duration::from_millis(self.price_timeout_ms) }

    pub fn engine_cfg(&self) -> EngineCfg {
        EngineCfg { swap_delay: Duration::from_millis(self.swap_delay_ms), history_cap: self.history_cap }
    }
}

pub fn load() -> Args {
    // Pastikan .env dibaca sebelum clap membaca ENV
    let _ = dotenv();
    Args::parse()
}
