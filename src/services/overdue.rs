//! Overdue sweep service

use std::{future::Future, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::{error::AppResult, models::LoanDetails, repository::Repository};

/// Outcome of one overdue sweep
#[derive(Debug, Clone, Serialize)]
pub struct OverdueReport {
    pub checked_at: DateTime<Utc>,
    pub overdue: Vec<LoanDetails>,
}

#[derive(Clone)]
pub struct OverdueService {
    repository: Repository,
}

impl OverdueService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Mark loans overdue as of `now` and list every overdue loan
    pub fn sweep(&self, now: DateTime<Utc>) -> AppResult<OverdueReport> {
        let count = self.repository.loans.update_overdue_status(now)?;
        let overdue: Vec<LoanDetails> = self
            .repository
            .loans
            .find_overdue_loans()
            .iter()
            .map(|loan| loan.read().details())
            .collect();

        tracing::info!("Overdue sweep at {}: {} overdue loans", now, count);
        Ok(OverdueReport {
            checked_at: now,
            overdue,
        })
    }

    /// Sweep now, then once per `period` until `shutdown` resolves.
    /// A zero period sweeps once and returns.
    pub async fn run(
        &self,
        period: Duration,
        shutdown: impl Future<Output = ()>,
    ) -> AppResult<()> {
        if period.is_zero() {
            self.sweep(Utc::now())?;
            return Ok(());
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep(Utc::now())?;
                }
                _ = &mut shutdown => {
                    tracing::info!("Overdue sweep stopped");
                    return Ok(());
                }
            }
        }
    }
}
