//! The polling loop: fetch, compute, detect, notify, sleep.

use crate::config::Config;
use crate::core::state::RunState;
use crate::indicators::momentum::MacdCalculator;
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, IndicatorFrame};
use crate::models::signal::{Signal, Timeframe};
use crate::services::charting::ChartRenderer;
use crate::services::discord::Notifier;
use crate::services::error::ServiceError;
use crate::services::market_data::MarketDataProvider;
use crate::services::news::NewsProvider;
use crate::signals::engine::SignalEngine;
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

/// Courtesy delay between consecutive daily messages
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    Idle,
    Fetching,
    Computing,
    Detecting,
    Notifying,
    Sleeping,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("{timeframe} fetch task failed: {source}")]
    FetchTask {
        timeframe: Timeframe,
        #[source]
        source: JoinError,
    },

    #[error("cycle panicked: {0}")]
    Panicked(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// What one cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub signals: usize,
    pub delivered: usize,
    pub failed: usize,
    pub daily_messages: usize,
}

/// External collaborators the loop talks to
#[derive(Clone)]
pub struct Collaborators {
    pub market: Arc<dyn MarketDataProvider>,
    pub renderer: Arc<dyn ChartRenderer>,
    pub notifier: Arc<dyn Notifier>,
    pub news: Arc<dyn NewsProvider>,
}

pub struct Monitor {
    config: Arc<Config>,
    calculator: MacdCalculator,
    engine: SignalEngine,
    collaborators: Collaborators,
    metrics: Option<Arc<Metrics>>,
    pacing: Duration,
    state: RunState,
    phase: MonitorPhase,
}

impl Monitor {
    pub fn new(config: Arc<Config>, collaborators: Collaborators) -> Self {
        Self {
            calculator: MacdCalculator::new(config.macd),
            engine: SignalEngine::new(config.symbol.clone()),
            config,
            collaborators,
            metrics: None,
            pacing: DEFAULT_PACING,
            state: RunState::new(),
            phase: MonitorPhase::Idle,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_state(mut self, state: RunState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    fn enter(&mut self, phase: MonitorPhase) {
        debug!(from = ?self.phase, to = ?phase, "Monitor phase change");
        self.phase = phase;
    }

    /// Run forever: startup message, then one cycle per poll interval.
    pub async fn run(mut self) {
        self.announce_startup().await;
        loop {
            self.tick_at(Utc::now()).await;
            self.enter(MonitorPhase::Sleeping);
            tokio::time::sleep(self.config.poll_interval).await;
            self.enter(MonitorPhase::Idle);
        }
    }

    pub async fn announce_startup(&self) {
        info!("Sending startup message.");
        let macd = self.calculator.params();
        let message = format!(
            "✅ **ZeroZoro Bot Started**\nMonitoring `{}` with MACD(`{}`,`{}`,`{}`)\nPolling every {:.0} minutes.",
            self.config.symbol,
            macd.fast,
            macd.slow,
            macd.signal,
            self.config.poll_interval.as_secs_f64() / 60.0
        );
        if let Err(e) = self.collaborators.notifier.deliver_text(&message).await {
            warn!(error = %e, "Startup message failed");
        }
    }

    /// One cycle with failure isolation. Never returns an error and never
    /// unwinds; a panic anywhere in the cycle is reported like an error.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> Option<CycleReport> {
        let outcome = match AssertUnwindSafe(self.run_cycle_at(now)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(MonitorError::Panicked(panic_message(payload.as_ref()))),
        };
        match outcome {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = %e, symbol = %self.config.symbol, "An unexpected error occurred in the monitor loop");
                if let Some(metrics) = &self.metrics {
                    metrics.cycle_failures_total.inc();
                }
                let message = format!(
                    "🔥 **ERROR:** An unexpected error occurred: `{}`. The bot is still running but may need attention.",
                    e
                );
                if let Err(e) = self.collaborators.notifier.deliver_text(&message).await {
                    warn!(error = %e, "Error report could not be delivered");
                }
                self.enter(MonitorPhase::Idle);
                None
            }
        }
    }

    pub async fn run_cycle(&mut self) -> Result<CycleReport, MonitorError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Market check followed by the daily news/events check
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport, MonitorError> {
        if let Some(metrics) = &self.metrics {
            metrics.cycles_total.inc();
        }
        let mut report = CycleReport::default();
        self.check_market_signals(&mut report).await?;
        self.check_daily_updates(now.date_naive(), &mut report).await;
        self.enter(MonitorPhase::Idle);
        Ok(report)
    }

    async fn check_market_signals(&mut self, report: &mut CycleReport) -> Result<(), MonitorError> {
        self.enter(MonitorPhase::Fetching);
        let (intraday, daily) = self.fetch_both().await?;

        self.enter(MonitorPhase::Computing);
        let intraday = self.calculator.apply(intraday);
        let daily = self.calculator.apply(daily);

        self.enter(MonitorPhase::Detecting);
        let signals = self
            .engine
            .find_signals(&mut self.state.crossings, &intraday, &daily);
        report.signals = signals.len();

        self.enter(MonitorPhase::Notifying);
        for signal in &signals {
            if let Some(metrics) = &self.metrics {
                metrics
                    .signals_emitted_total
                    .with_label_values(&[signal.rule.as_str()])
                    .inc();
            }
            let result = self.deliver_signal(signal).await;
            self.record_delivery(result, "alert", report);
        }
        Ok(())
    }

    /// Fetch both timeframes as two tasks and wait for both
    async fn fetch_both(&self) -> Result<(Vec<Candle>, Vec<Candle>), MonitorError> {
        let spawn_fetch = |timeframe: Timeframe, lookback: String| {
            let market = self.collaborators.market.clone();
            let symbol = self.config.symbol.clone();
            tokio::spawn(async move { market.fetch_series(&symbol, timeframe, &lookback).await })
        };
        let intraday = spawn_fetch(Timeframe::Intraday, self.config.intraday_lookback.clone());
        let daily = spawn_fetch(Timeframe::Daily, self.config.daily_lookback.clone());

        let (intraday, daily) = tokio::join!(intraday, daily);
        let intraday = intraday.map_err(|source| MonitorError::FetchTask {
            timeframe: Timeframe::Intraday,
            source,
        })?;
        let daily = daily.map_err(|source| MonitorError::FetchTask {
            timeframe: Timeframe::Daily,
            source,
        })?;
        debug!(
            intraday = intraday.len(),
            daily = daily.len(),
            "Fetched candle series"
        );
        Ok((intraday, daily))
    }

    /// Chart plus text, or text alone when rendering produced nothing
    async fn deliver_signal(&self, signal: &Signal) -> Result<(), ServiceError> {
        let content = signal.alert_text();
        let chart = self.render(&signal.snapshot, &signal.title);
        if chart.is_empty() {
            warn!(title = %signal.title, "Chart unavailable, sending text alert only");
            return self.collaborators.notifier.deliver_text(&content).await;
        }
        let filename = format!(
            "{}_alert.{}",
            self.config.symbol,
            self.collaborators.renderer.extension()
        );
        self.collaborators
            .notifier
            .deliver_file(&content, chart, &filename)
            .await
    }

    fn render(&self, frame: &IndicatorFrame, title: &str) -> Vec<u8> {
        self.collaborators.renderer.render_chart(frame, title)
    }

    async fn check_daily_updates(&mut self, today: NaiveDate, report: &mut CycleReport) {
        if !self.state.daily_update_due(today) {
            return;
        }
        info!(date = %today, "Performing daily news and events check...");

        let news = self
            .collaborators
            .news
            .poll_news(&mut self.state.seen_news_ids)
            .await;
        let events = self
            .collaborators
            .news
            .poll_events(&mut self.state.seen_event_ids)
            .await;

        for message in news.iter().chain(&events) {
            let result = self.collaborators.notifier.deliver_text(message).await;
            self.record_delivery(result, "daily update", report);
            report.daily_messages += 1;
            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        self.state.last_daily_update = Some(today);
    }

    fn record_delivery(
        &self,
        result: Result<(), ServiceError>,
        kind: &str,
        report: &mut CycleReport,
    ) {
        match result {
            Ok(()) => {
                report.delivered += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.notifications_sent_total.inc();
                }
            }
            Err(e) => {
                report.failed += 1;
                error!(error = %e, kind = kind, "Delivery failed after retries");
                if let Some(metrics) = &self.metrics {
                    metrics.notifications_failed_total.inc();
                }
            }
        }
    }
}
