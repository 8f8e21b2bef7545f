// ===============================
// src/main.rs
// ===============================
/*
 cd /home/kukuhtw/rust/swap_sim_rust

 # jalankan beberapa swap berurutan (jumlah jual | max | to=N, opsional :flip)
 SWAPS=SWTH:ETH:100,ETH:BTC:max,USDC:SWTH:to=50:flip RECORD_FILE=data/session.jsonl cargo run

 # log lebih detail
 RUST_LOG=swap_sim_rust=debug cargo run

 # metrics
 curl -s localhost:9898/metrics | egrep '^(swaps_total|price_loads_total|balance)'
*/
/*
=============================================================================
Project : swap_sim_rust — single-session token swap simulator in Rust
Module  : main.rs
Version : 0.5.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
License : MIT (see LICENSE)

Summary : Loads spot prices (remote JSON with timeout, default fallback),
          quotes conversions, validates balances, applies simulated swaps
          with bounded history, exposes Prometheus metrics, and records
          JSONL events.
=============================================================================
*/
mod domain;
mod config;
mod metrics;
mod recorder;
mod prices;
mod convert;
mod validate;
mod balances;
mod history;
mod tokens;
mod engine;

use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::balances::BalanceSheet;
use crate::convert::round_display;
use crate::domain::{Event, SwapStatus};
use crate::engine::ConversionEngine;

#[tokio::main]
async fn main() {
    // ---- Logging ----
    // RUST_LOG kalau ada, default info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ---- Config ----
    let args = config::load();
    info!(
        price_url = %args.price_url,
        price_timeout_ms = args.price_timeout_ms,
        swap_delay_ms = args.swap_delay_ms,
        history_cap = args.history_cap,
        swaps = args.swaps.len(),
        "startup config"
    );

    // ---- Metrics ----
    metrics::init();
    if args.metrics_port != 0 {
        metrics::serve_metrics(args.metrics_port);
    }

    // ---- Recorder (optional) ----
    let (rec_tx, rec_rx) = mpsc::channel::<Event>(1024);
    let recorder = args.record_file.clone().map(|path| tokio::spawn(recorder::run(rec_rx, path)));

    // ---- Prices (timeout -> default table) ----
    let http = reqwest::Client::new();
    let (table, source) = prices::fetch_prices(&http, &args.price_url, args.price_timeout()).await;

    // ---- Engine ----
    let engine = ConversionEngine::new(prices::PriceTable::defaults(), BalanceSheet::starting(), args.engine_cfg())
        .with_recorder(rec_tx);
    engine.refresh_prices(table, source).await;

    let current = engine.prices().await;
    for t in tokens::search(&args.token_filter) {
        if let Some(px) = current.get(t.symbol) {
            info!(symbol = t.symbol, name = t.name, price = px, icon = %t.icon_url(), "token");
        }
    }

    // ---- Swaps (berurutan; UI menonaktifkan tombol selama swap berjalan) ----
    for order in &args.swaps {
        let req = engine.resolve_order(order).await;
        let readiness = engine.readiness(&req).await;
        let quote = engine.quote(&req.from_token, &req.to_token, req.from_amount).await;
        info!(
            rate = %quote.rate_label(),
            expected = round_display(quote.to_amount),
            fee_usd = quote.network_fee_usd,
            button = %readiness.label(req.from_token.as_str(), req.to_token.as_str()),
            "quote"
        );

        // Tombol swap nonaktif -> order dilewati, tidak masuk riwayat
        if !readiness.is_enabled() {
            warn!(from = %req.from_token, to = %req.to_token, amount = req.from_amount, "swap skipped");
            continue;
        }

        let rec = engine.apply_swap(req).await;
        if rec.status == SwapStatus::Success {
            let to_name = tokens::find(rec.to_token.as_str()).map(|t| t.name).unwrap_or("unlisted token");
            info!(
                to_name,
                "Successfully swapped {} {} for {} {}",
                rec.from_amount,
                rec.from_token,
                round_display(rec.to_amount),
                rec.to_token
            );
        }
    }

    // ---- Final state ----
    let snap = engine.snapshot().await;
    for (sym, qty) in snap.balances.entries() {
        info!(token = %sym, balance = %format!("{qty:.4}"), "balance");
    }
    for rec in &snap.history {
        info!(
            status = ?rec.status,
            time = %rec.timestamp.format("%H:%M:%S"),
            "{} {} -> {} {}",
            rec.from_amount,
            rec.from_token,
            round_display(rec.to_amount),
            rec.to_token
        );
    }

    // Tutup channel recorder supaya task flush & selesai
    drop(engine);
    if let Some(handle) = recorder {
        if let Err(e) = handle.await {
            warn!(?e, "recorder task failed");
        }
    }
}
