// ===============================
// src/engine.rs (ConversionEngine: harga, saldo, riwayat swap)
// ===============================
//
// Alur apply_swap:
//   1) ambil swap_gate (swap diproses satu per satu)
//   2) validasi (can_swap) -> gagal: catat record Failed, saldo tidak disentuh
//   3) sleep swap_delay (simulasi proses, tidak bisa dibatalkan)
//   4) hitung to_amount pakai harga SAAT INI, lalu mutate saldo + append record
//      di bawah satu lock `state`
//
// Pembaca (snapshot) hanya melihat state sebelum atau sesudah langkah 4.
//
use chrono::Utc;
use rand::Rng;
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        Mutex, RwLock,
    },
    time::{sleep, Duration},
};
use tracing::{debug, info, warn};

use crate::balances::BalanceSheet;
use crate::convert::{convert, convert_reverse, Quote};
use crate::domain::{AmountSpec, Event, SwapOrder, SwapRecord, SwapRequest, SwapStatus, TokenSymbol};
use crate::history::{SwapHistory, DEFAULT_HISTORY_CAP};
use crate::metrics::{HISTORY_LEN, RECORDER_DROPPED, SWAPS};
use crate::prices::{PriceSource, PriceTable};
use crate::validate::{can_swap, swap_readiness, SwapReadiness};

pub const DEFAULT_SWAP_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct EngineCfg {
    pub swap_delay: Duration,
    pub history_cap: usize,
}

impl Default for EngineCfg {
    fn default() -> Self { Self { swap_delay: DEFAULT_SWAP_DELAY, history_cap: DEFAULT_HISTORY_CAP } }
}

#[derive(Debug)]
struct SessionState {
    balances: BalanceSheet,
    history: SwapHistory,
}

/// Consistent view of balances + history (most-recent-first).
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub balances: BalanceSheet,
    pub history: Vec<SwapRecord>,
}

pub struct ConversionEngine {
    prices: RwLock<PriceTable>,
    state: Mutex<SessionState>,
    swap_gate: Mutex<()>,
    cfg: EngineCfg,
    rec_tx: Option<mpsc::Sender<Event>>,
}

impl ConversionEngine {
    pub fn new(prices: PriceTable, balances: BalanceSheet, cfg: EngineCfg) -> Self {
        let history = SwapHistory::with_capacity(cfg.history_cap);
        balances.export_metrics();
        Self {
            prices: RwLock::new(prices),
            state: Mutex::new(SessionState { balances, history }),
            swap_gate: Mutex::new(()),
            cfg,
            rec_tx: None,
        }
    }

    /// Kirim Event ke recorder JSONL (opsional).
    pub fn with_recorder(mut self, tx: mpsc::Sender<Event>) -> Self {
        self.rec_tx = Some(tx);
        self
    }

    fn emit(&self, ev: Event) {
        let Some(tx) = &self.rec_tx else { return };
        match tx.try_send(ev) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                RECORDER_DROPPED.inc();
                warn!("recorder channel full, event dropped");
            }
            // Recorder tidak aktif (RECORD_FILE kosong)
            Err(TrySendError::Closed(_)) => debug!("recorder closed, event dropped"),
        }
    }

    pub async fn prices(&self) -> PriceTable { self.prices.read().await.clone() }

    /// Ganti seluruh tabel harga; swap berikutnya memakai harga baru.
    pub async fn refresh_prices(&self, table: PriceTable, source: PriceSource) {
        let entries = table.entries();
        info!(source = source.as_str(), entries = table.len(), "price table replaced");
        *self.prices.write().await = table;
        self.emit(Event::Prices { source: source.as_str().to_string(), table: entries });
    }

    pub async fn quote(&self, from: &TokenSymbol, to: &TokenSymbol, from_amount: f64) -> Quote {
        let prices = self.prices.read().await;
        let to_amount = convert(from_amount, from.as_str(), to.as_str(), &prices);
        Quote::build(from, to, from_amount, to_amount, &prices)
    }

    /// Quote from the receiving side: how much `from` is needed for `to_amount`.
    pub async fn quote_reverse(&self, from: &TokenSymbol, to: &TokenSymbol, to_amount: f64) -> Quote {
        let prices = self.prices.read().await;
        let from_amount = convert_reverse(to_amount, from.as_str(), to.as_str(), &prices);
        Quote::build(from, to, from_amount, to_amount, &prices)
    }

    pub async fn max_amount(&self, token: &str) -> f64 { self.state.lock().await.balances.balance_of(token) }

    /// Order CLI -> SwapRequest: flip arah dulu, lalu tentukan from_amount
    /// (Sell apa adanya, Receive lewat quote_reverse, Max = seluruh saldo).
    pub async fn resolve_order(&self, order: &SwapOrder) -> SwapRequest {
        let mut req = order.pair();
        req.from_amount = match order.amount {
            AmountSpec::Sell(x) => x,
            AmountSpec::Receive(y) => self.quote_reverse(&req.from_token, &req.to_token, y).await.from_amount,
            AmountSpec::Max => self.max_amount(req.from_token.as_str()).await,
        };
        req
    }

    pub async fn readiness(&self, req: &SwapRequest) -> SwapReadiness {
        let st = self.state.lock().await;
        swap_readiness(req.from_token.as_str(), req.to_token.as_str(), req.from_amount, &st.balances)
    }

    pub async fn snapshot(&self) -> Snapshot {
        let st = self.state.lock().await;
        Snapshot { balances: st.balances.clone(), history: st.history.to_vec() }
    }

    fn new_record(req: &SwapRequest, to_amount: f64, status: SwapStatus, reason: Option<String>) -> SwapRecord {
        let now = Utc::now();
        let id = format!(
            "SW-{}-{}",
            now.timestamp_nanos_opt().unwrap_or(0),
            rand::thread_rng().gen::<u32>()
        );
        SwapRecord {
            id,
            from_token: req.from_token.clone(),
            from_amount: req.from_amount,
            to_token: req.to_token.clone(),
            to_amount,
            status,
            reason,
            timestamp: now,
        }
    }

    fn append(&self, st: &mut SessionState, rec: &SwapRecord) {
        if let Some(old) = st.history.push(rec.clone()) {
            tracing::debug!(id = %old.id, "history evicted");
        }
        HISTORY_LEN.set(st.history.len() as i64);
    }

    /// Validasi -> delay -> mutate + record (atomik). Gagal validasi -> record Failed.
    pub async fn apply_swap(&self, req: SwapRequest) -> SwapRecord {
        let _gate = self.swap_gate.lock().await;

        let check = {
            let st = self.state.lock().await;
            can_swap(req.from_token.as_str(), req.to_token.as_str(), req.from_amount, &st.balances)
        };

        if let Err(e) = check {
            let rec = Self::new_record(&req, 0.0, SwapStatus::Failed, Some(e.to_string()));
            {
                let mut st = self.state.lock().await;
                self.append(&mut st, &rec);
            }
            SWAPS.with_label_values(&["failed"]).inc();
            warn!(from = %req.from_token, to = %req.to_token, amount = req.from_amount, reason = %e, "swap rejected");
            self.emit(Event::Swap(rec.clone()));
            return rec;
        }

        sleep(self.cfg.swap_delay).await;

        let rec = {
            let prices = self.prices.read().await;
            let to_amount = convert(req.from_amount, req.from_token.as_str(), req.to_token.as_str(), &prices);
            let mut st = self.state.lock().await;
            st.balances.transfer(&req.from_token, req.from_amount, &req.to_token, to_amount);
            let rec = Self::new_record(&req, to_amount, SwapStatus::Success, None);
            self.append(&mut st, &rec);
            st.balances.export_metrics();
            rec
        };

        SWAPS.with_label_values(&["success"]).inc();
        info!(
            id = %rec.id,
            from = %rec.from_token,
            amount = rec.from_amount,
            to = %rec.to_token,
            received = rec.to_amount,
            "swap done"
        );
        self.emit(Event::Swap(rec.clone()));
        rec
    }
}
