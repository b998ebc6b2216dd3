//! One portfolio refresh: resolve trading days, fetch market data, calculate.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{chart, performance, CalculationResult};
use crate::calendar::TradingSession;
use crate::clock::{Clock, SystemClock};
use crate::format::error_summary;
use crate::market_data::MarketDataService;
use crate::models::{ChartSeries, Holding, Report};
use crate::storage::HoldingsStore;
use crate::validation::zip2;

/// Default length of the chart window, in calendar days.
pub const DEFAULT_CHART_WINDOW_DAYS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingDays {
    pub current: NaiveDate,
    pub previous: NaiveDate,
}

/// Everything a refresh produces when all holdings validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioUpdate {
    pub report: Report,
    pub chart: ChartSeries,
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub days: TradingDays,
    /// Report and chart, or every validation error of both calculations.
    pub result: CalculationResult<PortfolioUpdate>,
}

pub struct UpdateService {
    holdings: Arc<dyn HoldingsStore>,
    market_data: Arc<MarketDataService>,
    session: TradingSession,
    clock: Arc<dyn Clock>,
    chart_window_days: u32,
}

impl UpdateService {
    pub fn new(holdings: Arc<dyn HoldingsStore>, market_data: Arc<MarketDataService>) -> Self {
        Self {
            holdings,
            market_data,
            session: TradingSession::default(),
            clock: Arc::new(SystemClock),
            chart_window_days: DEFAULT_CHART_WINDOW_DAYS,
        }
    }

    pub fn with_session(mut self, session: TradingSession) -> Self {
        self.session = session;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_chart_window_days(mut self, days: u32) -> Self {
        self.chart_window_days = days;
        self
    }

    /// The current and previous trading day according to the service clock.
    pub fn trading_days(&self) -> Result<TradingDays> {
        let current = self
            .session
            .current_trading_day(self.clock.as_ref())
            .context("Failed to resolve current trading day")?;
        let previous = self
            .session
            .previous_trading_day(current)
            .context("Failed to resolve previous trading day")?;
        Ok(TradingDays { current, previous })
    }

    /// Performance of all holdings between `previous` and `current`.
    ///
    /// The outer error is a collaborator failure (holdings store or market
    /// data); the inner result carries validation errors.
    pub async fn calculate_performance(
        &self,
        current: NaiveDate,
        previous: NaiveDate,
    ) -> Result<CalculationResult<Report>> {
        let holdings = self.load_holdings().await?;
        self.performance_for(&holdings, current, previous).await
    }

    /// Portfolio value per trading day over the chart window ending at `current`.
    pub async fn chart_data(&self, current: NaiveDate) -> Result<CalculationResult<ChartSeries>> {
        let holdings = self.load_holdings().await?;
        self.chart_for(&holdings, current).await
    }

    /// Runs a full refresh for the current trading day.
    ///
    /// Holdings are read once so the report and the chart describe the same
    /// portfolio.
    pub async fn refresh(&self) -> Result<UpdateOutcome> {
        let days = self.trading_days()?;
        info!(
            current = %days.current,
            previous = %days.previous,
            source = %self.market_data.source_name(),
            "refreshing portfolio"
        );

        let holdings = self.load_holdings().await?;
        let (report, chart) = tokio::try_join!(
            self.performance_for(&holdings, days.current, days.previous),
            self.chart_for(&holdings, days.current),
        )?;

        let result = zip2(report, chart).map(|(report, chart)| PortfolioUpdate { report, chart });
        match &result {
            Ok(update) => info!(
                percent_today = %update.report.percent_today,
                percent_total = %update.report.percent_total,
                chart_points = update.chart.len(),
                "portfolio refreshed"
            ),
            Err(errors) => warn!(errors = %error_summary(errors), "portfolio data rejected"),
        }

        Ok(UpdateOutcome { days, result })
    }

    async fn performance_for(
        &self,
        holdings: &[Holding],
        current: NaiveDate,
        previous: NaiveDate,
    ) -> Result<CalculationResult<Report>> {
        let isins = identifiers(holdings);
        let (today, yesterday) = tokio::try_join!(
            self.market_data.fetch_day(&isins, current),
            self.market_data.fetch_day(&isins, previous),
        )?;

        Ok(performance::calculate(holdings, &today, &yesterday))
    }

    async fn chart_for(
        &self,
        holdings: &[Holding],
        current: NaiveDate,
    ) -> Result<CalculationResult<ChartSeries>> {
        let isins = identifiers(holdings);
        let start = current - Duration::days(i64::from(self.chart_window_days));
        let window = self.market_data.fetch_range(&isins, start, current).await?;

        Ok(chart::calculate(holdings, &window))
    }

    async fn load_holdings(&self) -> Result<Vec<Holding>> {
        self.holdings
            .all_holdings()
            .await
            .context("Failed to load holdings")
    }
}

fn identifiers(holdings: &[Holding]) -> Vec<String> {
    holdings.iter().map(|h| h.isin.clone()).collect()
}
