//! Atomic matching pass over a working set of needs and supplies.
//!
//! The engine walks unfulfilled needs in effective-priority order and
//! allocates supply slices by descending match score, recording every
//! applied quantity change in an [`AllocationTransaction`]. The pass is
//! all-or-nothing: any internal failure reverses the whole ledger before
//! the result is returned, so callers never observe a half-applied pass.
//!
//! # Allocation protocol per slice
//!
//! 1. `supply.reserve(slice)` — must succeed, the slice was sized from
//!    allocatable stock
//! 2. `supply.deduct_stock(slice)` — consumes the reservation
//! 3. `need.add_fulfilled_quantity(slice)` — clamped at required
//!
//! Each step is recorded right after it applies, so the ledger never holds
//! an operation that did not happen.

use chrono::{DateTime, Utc};
use reliefmatch_types::{
    AgingConfig, AuditEntry, AuditEventKind, AuditSink, MatchingConfig, MatchingResult, Need,
    NeedAllocation, ReliefError, Result, Supply, SupplyAllocation,
};

use crate::priority::PriorityManager;
use crate::score::match_score;
use crate::transaction::AllocationTransaction;

/// Executes atomic matching passes.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    config: MatchingConfig,
    priority: PriorityManager,
    /// Abort the pass once this many slices have been applied. Exercises
    /// the rollback path.
    #[cfg(any(test, feature = "test-helpers"))]
    fail_after_slices: Option<usize>,
}

impl MatchingEngine {
    #[must_use]
    pub fn new(config: MatchingConfig, aging: AgingConfig) -> Self {
        Self {
            config,
            priority: PriorityManager::new(aging),
            #[cfg(any(test, feature = "test-helpers"))]
            fail_after_slices: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Run one atomic matching pass.
    ///
    /// On success the quantity mutations are committed and audit events
    /// fire; on any internal failure every recorded change is reversed and
    /// the cause is reported in [`MatchingResult::error`]. Callers must not
    /// mutate the slices concurrently with the pass.
    pub fn run(
        &self,
        needs: &mut [Need],
        supplies: &mut [Supply],
        now: DateTime<Utc>,
        sink: &dyn AuditSink,
    ) -> MatchingResult {
        let order = self.priority.prioritize_indices(needs, now);
        if order.is_empty() {
            return MatchingResult::succeeded("no unfulfilled needs to match", Vec::new());
        }

        let mut tx = AllocationTransaction::new();
        let mut allocations: Vec<NeedAllocation> = Vec::new();

        match self.allocate_pass(&order, needs, supplies, now, &mut tx, &mut allocations) {
            Ok(()) => {
                tx.commit();
                self.emit_success_events(&allocations, sink, now);

                let total = allocations.iter().map(NeedAllocation::total_quantity).sum::<u32>();
                let message = if allocations.is_empty() {
                    "no viable allocations in this pass".to_string()
                } else {
                    format!(
                        "allocated {total} units across {} needs",
                        allocations.len()
                    )
                };
                tracing::info!(
                    needs_considered = order.len(),
                    needs_allocated = allocations.len(),
                    total_quantity = total,
                    "matching pass committed"
                );
                MatchingResult::succeeded(message, allocations)
            }
            Err(err) => {
                let reason = err.to_string();
                tx.rollback(needs, supplies, now);
                sink.record(
                    AuditEntry::new(
                        AuditEventKind::MatchFailed,
                        format!("matching pass rolled back: {reason}"),
                        now,
                    )
                    .with_metadata("needs_considered", order.len() as i64),
                );
                tracing::warn!(error = %reason, "matching pass rolled back");
                MatchingResult::failed(reason)
            }
        }
    }

    fn allocate_pass(
        &self,
        order: &[usize],
        needs: &mut [Need],
        supplies: &mut [Supply],
        now: DateTime<Utc>,
        tx: &mut AllocationTransaction,
        allocations: &mut Vec<NeedAllocation>,
    ) -> Result<()> {
        let mut slices_applied = 0usize;
        for &ni in order {
            if needs[ni].is_fulfilled() {
                continue;
            }
            let candidates = self.rank_candidates(&needs[ni], supplies, now);
            let slices = self.allocate_for_need(
                ni,
                &candidates,
                needs,
                supplies,
                now,
                tx,
                &mut slices_applied,
            )?;
            if !slices.is_empty() {
                allocations.push(NeedAllocation {
                    need_id: needs[ni].id(),
                    need_title: needs[ni].title.clone(),
                    allocations: slices,
                    allocated_at: now,
                    fulfillment_percent_after: needs[ni].fulfillment_percent(),
                });
            }
        }
        Ok(())
    }

    /// Eligible supplies for a need, scored and ordered descending. The
    /// sort is stable, so equal scores keep candidate-list insertion order.
    fn rank_candidates(
        &self,
        need: &Need,
        supplies: &[Supply],
        now: DateTime<Utc>,
    ) -> Vec<(usize, f64)> {
        let mut candidates: Vec<(usize, f64)> = supplies
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.meta.is_deleted && !s.is_expired(now) && s.allocatable() > 0)
            .map(|(si, s)| (si, match_score(need, s, &self.config, now)))
            .filter(|&(_, score)| score > 0.0)
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates
    }

    fn allocate_for_need(
        &self,
        ni: usize,
        candidates: &[(usize, f64)],
        needs: &mut [Need],
        supplies: &mut [Supply],
        now: DateTime<Utc>,
        tx: &mut AllocationTransaction,
        slices_applied: &mut usize,
    ) -> Result<Vec<SupplyAllocation>> {
        let required = needs[ni].quantity_required;
        let target = needs[ni].remaining();
        let mut accumulated = 0u32;
        let mut out = Vec::new();

        for &(si, score) in candidates {
            if accumulated >= target {
                break;
            }
            let allocatable = supplies[si].allocatable();
            if allocatable == 0 {
                // Drained by an earlier need in this pass.
                continue;
            }
            let slice = allocatable.min(target - accumulated);

            if accumulated == 0 {
                if self.config.allow_partial_fulfillment {
                    let floor =
                        self.config.min_partial_fulfillment_percent / 100.0 * f64::from(required);
                    if f64::from(slice) < floor {
                        // First slice too small to be worth dispatching.
                        continue;
                    }
                } else if allocatable < target {
                    // Best candidate cannot cover the whole remainder:
                    // leave the need for a later run.
                    break;
                }
            }

            self.fail_if_injected(*slices_applied)?;
            self.apply_slice(ni, si, slice, score, needs, supplies, now, tx, &mut out)?;
            accumulated += slice;
            *slices_applied += 1;
        }

        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_slice(
        &self,
        ni: usize,
        si: usize,
        slice: u32,
        score: f64,
        needs: &mut [Need],
        supplies: &mut [Supply],
        now: DateTime<Utc>,
        tx: &mut AllocationTransaction,
        out: &mut Vec<SupplyAllocation>,
    ) -> Result<()> {
        let supply_id = supplies[si].id();

        if !supplies[si].reserve(slice, now) {
            return Err(ReliefError::MatchingAborted {
                reason: format!("reservation of {slice} rejected by {supply_id}"),
            });
        }
        tx.record_reserve(si, slice);

        let reserved_consumed = supplies[si].reserved >= slice;
        if !supplies[si].deduct_stock(slice, now) {
            return Err(ReliefError::MatchingAborted {
                reason: format!("stock deduction of {slice} rejected by {supply_id}"),
            });
        }
        tx.record_deduct(si, slice, reserved_consumed);

        let before = needs[ni].quantity_fulfilled;
        if !needs[ni].add_fulfilled_quantity(slice, now) {
            return Err(ReliefError::MatchingAborted {
                reason: format!("fulfillment update of {slice} rejected by {}", needs[ni].id()),
            });
        }
        tx.record_fulfill(ni, needs[ni].quantity_fulfilled - before);

        let supply_exhausted = supplies[si].allocatable() == 0;
        tracing::debug!(
            need = %needs[ni].id(),
            supply = %supply_id,
            qty = slice,
            score,
            exhausted = supply_exhausted,
            "slice allocated"
        );
        out.push(SupplyAllocation {
            supply_id,
            supply_name: supplies[si].name.clone(),
            quantity: slice,
            match_score: score,
            supply_exhausted,
        });
        Ok(())
    }

    fn emit_success_events(
        &self,
        allocations: &[NeedAllocation],
        sink: &dyn AuditSink,
        now: DateTime<Utc>,
    ) {
        for alloc in allocations {
            sink.record(
                AuditEntry::new(
                    AuditEventKind::MatchMade,
                    format!(
                        "allocated {} units to '{}' from {} supplies",
                        alloc.total_quantity(),
                        alloc.need_title,
                        alloc.allocations.len()
                    ),
                    now,
                )
                .with_entity(alloc.need_id.0, "Need")
                .with_metadata("quantity", alloc.total_quantity())
                .with_metadata("fulfillment_percent", alloc.fulfillment_percent_after),
            );
            if alloc.fully_fulfilled() {
                sink.record(
                    AuditEntry::new(
                        AuditEventKind::NeedFulfilled,
                        format!("need '{}' fully fulfilled", alloc.need_title),
                        now,
                    )
                    .with_entity(alloc.need_id.0, "Need"),
                );
            }
            for slice in &alloc.allocations {
                if slice.supply_exhausted {
                    sink.record(
                        AuditEntry::new(
                            AuditEventKind::SupplyDepleted,
                            format!("supply '{}' exhausted", slice.supply_name),
                            now,
                        )
                        .with_entity(slice.supply_id.0, "Supply"),
                    );
                }
            }
        }
    }

    #[cfg(any(test, feature = "test-helpers"))]
    fn fail_if_injected(&self, slices_applied: usize) -> Result<()> {
        if let Some(limit) = self.fail_after_slices {
            if slices_applied >= limit {
                return Err(ReliefError::MatchingAborted {
                    reason: "injected mid-pass failure".into(),
                });
            }
        }
        Ok(())
    }

    #[cfg(not(any(test, feature = "test-helpers")))]
    #[allow(clippy::unused_self)]
    fn fail_if_injected(&self, _slices_applied: usize) -> Result<()> {
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl MatchingEngine {
    /// Abort the pass right before slice `n + 1` would apply.
    #[must_use]
    pub fn fail_after_slices(mut self, n: usize) -> Self {
        self.fail_after_slices = Some(n);
        self
    }
}
