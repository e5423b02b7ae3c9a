//! In-memory quantity ledger for one matching pass.
//!
//! Every applied quantity change is recorded as a ledger operation indexed
//! into the caller's need/supply slices. On failure the ledger is replayed
//! in reverse through the same public mutators used on the forward path,
//! restoring every touched entity to its exact pre-pass quantities. Commit
//! consumes the transaction — once committed, rollback is unrepresentable.
//!
//! The transaction is single-thread-scoped and purely in-memory: it
//! guarantees nothing across processes, only that an aborted pass leaves
//! the working set as it was at entry.

use chrono::{DateTime, Utc};
use reliefmatch_types::{Need, Supply};

/// One recorded quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LedgerOp {
    /// `supplies[supply].reserve(qty)` was applied.
    Reserve { supply: usize, qty: u32 },
    /// `supplies[supply].deduct_stock(qty)` was applied.
    /// `reserved_consumed` records whether the deduction also consumed
    /// reservation (`reserved ≥ qty` held at the time).
    Deduct {
        supply: usize,
        qty: u32,
        reserved_consumed: bool,
    },
    /// `needs[need].add_fulfilled_quantity` advanced fulfillment by `qty`
    /// (the actual post-clamp delta).
    Fulfill { need: usize, qty: u32 },
}

/// Ledger of quantity deltas applied during one matching pass.
#[derive(Debug, Default)]
pub struct AllocationTransaction {
    ops: Vec<LedgerOp>,
}

impl AllocationTransaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    pub fn record_reserve(&mut self, supply: usize, qty: u32) {
        self.ops.push(LedgerOp::Reserve { supply, qty });
    }

    pub fn record_deduct(&mut self, supply: usize, qty: u32, reserved_consumed: bool) {
        self.ops.push(LedgerOp::Deduct {
            supply,
            qty,
            reserved_consumed,
        });
    }

    pub fn record_fulfill(&mut self, need: usize, qty: u32) {
        self.ops.push(LedgerOp::Fulfill { need, qty });
    }

    /// Commit the pass. The ledger becomes the record of what happened;
    /// consuming `self` makes any later rollback unrepresentable.
    pub fn commit(self) {
        tracing::debug!(ops = self.ops.len(), "allocation transaction committed");
    }

    /// Reverse every recorded operation, newest first, through the same
    /// public mutators used on the forward path.
    pub fn rollback(self, needs: &mut [Need], supplies: &mut [Supply], now: DateTime<Utc>) {
        tracing::warn!(ops = self.ops.len(), "rolling back allocation transaction");
        for op in self.ops.into_iter().rev() {
            match op {
                LedgerOp::Reserve { supply, qty } => {
                    supplies[supply].release_reservation(qty, now);
                }
                LedgerOp::Deduct {
                    supply,
                    qty,
                    reserved_consumed,
                } => {
                    supplies[supply].add_stock(qty, now);
                    if reserved_consumed {
                        supplies[supply].reserve(qty, now);
                    }
                }
                LedgerOp::Fulfill { need, qty } => {
                    needs[need].remove_fulfilled_quantity(qty, now);
                }
            }
        }
    }
}
