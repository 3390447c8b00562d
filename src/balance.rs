//! Balance ledger and best run
//!
//! Persisted to LocalStorage. Each completed run credits its final score to
//! the balance exactly once; "withdrawal" is local bookkeeping only - the
//! balance resets, nothing leaves the browser.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_WITHDRAWAL;
use crate::store::{self, keys};

/// Why a withdrawal was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawError {
    /// Balance is under the fixed minimum
    BelowMinimum { balance: u64, required: u64 },
}

impl std::fmt::Display for WithdrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawError::BelowMinimum { balance, required } => {
                write!(f, "Need at least {required} points to withdraw (have {balance})")
            }
        }
    }
}

/// The best completed run, persisted as a JSON record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct BestRun {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Process-wide point ledger, shared across runs
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    pub balance: u64,
    pub best: BestRun,
    /// Guard against double-crediting one run when the terminal UI re-renders
    settled: bool,
}

impl BalanceLedger {
    /// Load persisted state: balance is a base-10 scalar, best run is JSON.
    /// Both default cleanly when absent or corrupt.
    pub fn load() -> Self {
        Self {
            balance: store::load_u64(keys::BALANCE),
            best: store::load_json(keys::BEST_RUN),
            settled: false,
        }
    }

    fn save(&self) {
        store::save_u64(keys::BALANCE, self.balance);
        store::save_json(keys::BEST_RUN, &self.best);
    }

    pub fn best_score(&self) -> u64 {
        self.best.score
    }

    /// Arm the ledger for a new run; the next `settle` will be accepted
    pub fn begin_run(&mut self) {
        self.settled = false;
    }

    /// Credit a completed run's final score. Idempotent per run: repeated
    /// calls between `begin_run`s are ignored. Returns whether credit applied.
    pub fn settle(&mut self, final_score: u64, timestamp: f64) -> bool {
        if self.settled {
            return false;
        }
        self.settled = true;
        self.balance += final_score;
        if final_score > self.best.score {
            self.best = BestRun {
                score: final_score,
                timestamp,
            };
            log::info!("New best score: {final_score}");
        }
        self.save();
        true
    }

    /// High-score candidate for the game-over notification
    pub fn best_candidate(&self, score: u64) -> u64 {
        self.best.score.max(score)
    }

    /// Reset the balance to 0 if it meets the minimum. Returns the amount
    /// "withdrawn" on success; no real transfer happens.
    pub fn withdraw(&mut self) -> Result<u64, WithdrawError> {
        if self.balance < MIN_WITHDRAWAL {
            return Err(WithdrawError::BelowMinimum {
                balance: self.balance,
                required: MIN_WITHDRAWAL,
            });
        }
        let amount = self.balance;
        self.balance = 0;
        self.save();
        log::info!("Withdrew {amount} points (cosmetic)");
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_credits_once_per_run() {
        let mut ledger = BalanceLedger::default();
        ledger.begin_run();
        assert!(ledger.settle(120, 0.0));
        assert_eq!(ledger.balance, 120);

        // Terminal UI re-render must not double-credit
        assert!(!ledger.settle(120, 0.0));
        assert_eq!(ledger.balance, 120);

        ledger.begin_run();
        assert!(ledger.settle(80, 0.0));
        assert_eq!(ledger.balance, 200);
    }

    #[test]
    fn settle_tracks_best_run() {
        let mut ledger = BalanceLedger::default();
        ledger.begin_run();
        ledger.settle(300, 1000.0);
        assert_eq!(ledger.best_score(), 300);
        assert_eq!(ledger.best.timestamp, 1000.0);

        // A worse run leaves the record alone
        ledger.begin_run();
        ledger.settle(150, 2000.0);
        assert_eq!(ledger.best_score(), 300);
        assert_eq!(ledger.best.timestamp, 1000.0);

        assert_eq!(ledger.best_candidate(150), 300);
        assert_eq!(ledger.best_candidate(500), 500);
    }

    #[test]
    fn withdraw_at_exact_minimum_succeeds() {
        let mut ledger = BalanceLedger {
            balance: MIN_WITHDRAWAL,
            ..Default::default()
        };
        assert_eq!(ledger.withdraw(), Ok(MIN_WITHDRAWAL));
        assert_eq!(ledger.balance, 0);
    }

    #[test]
    fn withdraw_below_minimum_is_rejected() {
        let mut ledger = BalanceLedger {
            balance: MIN_WITHDRAWAL - 1,
            ..Default::default()
        };
        let err = ledger.withdraw().unwrap_err();
        assert_eq!(
            err,
            WithdrawError::BelowMinimum {
                balance: MIN_WITHDRAWAL - 1,
                required: MIN_WITHDRAWAL,
            }
        );
        // Balance unchanged on rejection
        assert_eq!(ledger.balance, MIN_WITHDRAWAL - 1);
    }
}
