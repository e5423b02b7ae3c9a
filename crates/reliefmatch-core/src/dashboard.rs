//! System-health snapshot aggregation and panic detection.
//!
//! The dashboard is stateless: each snapshot is computed from scratch over
//! the caller's collections, and the panic signal is level-triggered — it
//! re-fires on every snapshot while the condition holds. Rate limiting, if
//! wanted, belongs in the caller.
//!
//! # Panic predicate
//!
//! A need panics when all of these hold:
//! 1. not soft-deleted
//! 2. not fulfilled
//! 3. effectively Critical after aging
//! 4. waited ≥ the panic threshold
//! 5. nothing delivered at all, or waited > 2× the threshold

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use reliefmatch_types::{
    AgingConfig, AuditEntry, AuditEventKind, AuditSink, CriticalItem, DashboardConfig,
    DashboardSnapshot, Need, NeedStats, PanicAlert, PriorityLevel, ReliefObserver, Shipment,
    ShipmentStats, ShipmentStatus, Supply, SupplyStats,
};

use crate::priority::PriorityManager;

/// Aggregates system state and raises the panic signal.
#[derive(Debug, Default)]
pub struct Dashboard {
    priority: PriorityManager,
    config: DashboardConfig,
}

impl Dashboard {
    #[must_use]
    pub fn new(aging: AgingConfig, config: DashboardConfig) -> Self {
        Self {
            priority: PriorityManager::new(aging),
            config,
        }
    }

    /// Compute one snapshot. When the panic set is non-empty, exactly one
    /// `PanicModeTriggered` audit event is recorded and each observer is
    /// notified exactly once. Observer panics are contained and reported as
    /// `SystemAlert` entries; they never corrupt the snapshot.
    pub fn snapshot(
        &self,
        needs: &[Need],
        supplies: &[Supply],
        shipments: &[Shipment],
        now: DateTime<Utc>,
        sink: &dyn AuditSink,
        observers: &[&dyn ReliefObserver],
    ) -> DashboardSnapshot {
        let live_needs: Vec<&Need> = needs.iter().filter(|n| !n.meta.is_deleted).collect();
        let live_supplies: Vec<&Supply> =
            supplies.iter().filter(|s| !s.meta.is_deleted).collect();
        let live_shipments: Vec<&Shipment> =
            shipments.iter().filter(|s| !s.meta.is_deleted).collect();

        let panicking = self.detect_panic(&live_needs, now);
        if !panicking.is_empty() {
            self.raise_panic(&panicking, now, sink, observers);
        }

        DashboardSnapshot {
            generated_at: now,
            needs: need_stats(&live_needs),
            supplies: supply_stats(&live_supplies),
            shipments: shipment_stats(&live_shipments, now),
            top_critical: self.top_critical(&live_needs, now),
            category_fulfillment: category_fulfillment(&live_needs),
            category_allocatable: category_allocatable(&live_supplies),
            panicking,
        }
    }

    /// Needs currently starved past the panic threshold, most starved
    /// first.
    fn detect_panic(&self, needs: &[&Need], now: DateTime<Utc>) -> Vec<PanicAlert> {
        let threshold = self.priority.aging_config().panic_threshold_hours;
        let mut alerts: Vec<PanicAlert> = needs
            .iter()
            .filter(|n| !n.is_fulfilled())
            .filter(|n| self.priority.effective_level(n, now) == PriorityLevel::Critical)
            .filter_map(|n| {
                let waited = n.meta.hours_since_created(now);
                if waited < threshold {
                    return None;
                }
                let starved = n.fulfillment_percent() == 0.0 || waited > 2.0 * threshold;
                starved.then(|| PanicAlert {
                    need_id: n.id(),
                    title: n.title.clone(),
                    base_priority: n.priority,
                    hours_waiting: waited,
                    threshold_hours: threshold,
                    fulfillment_percent: n.fulfillment_percent(),
                })
            })
            .collect();
        alerts.sort_by(|a, b| b.hours_over_threshold().total_cmp(&a.hours_over_threshold()));
        alerts
    }

    fn raise_panic(
        &self,
        alerts: &[PanicAlert],
        now: DateTime<Utc>,
        sink: &dyn AuditSink,
        observers: &[&dyn ReliefObserver],
    ) {
        tracing::warn!(count = alerts.len(), "panic mode: critical needs starving");
        sink.record(
            AuditEntry::new(
                AuditEventKind::PanicModeTriggered,
                format!("{} critical needs starving past threshold", alerts.len()),
                now,
            )
            .with_priority(PriorityLevel::Critical)
            .with_metadata("count", alerts.len() as i64),
        );

        for observer in observers {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                observer.on_panic_mode_triggered(alerts);
            }));
            if outcome.is_err() {
                sink.record(AuditEntry::new(
                    AuditEventKind::SystemAlert,
                    "panic observer panicked; discarded",
                    now,
                ));
            }
        }
    }

    /// Unfulfilled needs with nothing delivered, ranked by ascending
    /// effective score then descending wait, truncated to the configured
    /// count.
    fn top_critical(&self, needs: &[&Need], now: DateTime<Utc>) -> Vec<CriticalItem> {
        let mut items: Vec<(f64, f64, CriticalItem)> = needs
            .iter()
            .filter(|n| n.quantity_fulfilled == 0)
            .map(|n| {
                let score = self.priority.effective_score(n, now);
                let waited = n.meta.hours_since_created(now);
                (
                    score,
                    waited,
                    CriticalItem {
                        need_id: n.id(),
                        title: n.title.clone(),
                        category: n.category.clone(),
                        effective_score: score,
                        hours_waiting: waited,
                        remaining: n.remaining(),
                        unit: n.unit.clone(),
                    },
                )
            })
            .collect();
        items.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.total_cmp(&a.1)));
        items
            .into_iter()
            .take(self.config.top_critical_count)
            .map(|(_, _, item)| item)
            .collect()
    }
}

fn need_stats(needs: &[&Need]) -> NeedStats {
    let total_required: u64 = needs.iter().map(|n| u64::from(n.quantity_required)).sum();
    let total_fulfilled: u64 = needs.iter().map(|n| u64::from(n.quantity_fulfilled)).sum();
    let percent_met = if total_required == 0 {
        0.0
    } else {
        total_fulfilled as f64 / total_required as f64 * 100.0
    };

    NeedStats {
        total: needs.len(),
        fulfilled: needs.iter().filter(|n| n.is_fulfilled()).count(),
        partially_fulfilled: needs
            .iter()
            .filter(|n| n.quantity_fulfilled > 0 && !n.is_fulfilled())
            .count(),
        unfulfilled: needs.iter().filter(|n| n.quantity_fulfilled == 0).count(),
        percent_met,
    }
}

fn supply_stats(supplies: &[&Supply]) -> SupplyStats {
    SupplyStats {
        total: supplies.len(),
        depleted: supplies.iter().filter(|s| s.allocatable() == 0).count(),
        low_stock: supplies
            .iter()
            .filter(|s| s.is_below_minimum_stock() && s.allocatable() > 0)
            .count(),
    }
}

fn shipment_stats(shipments: &[&Shipment], now: DateTime<Utc>) -> ShipmentStats {
    use ShipmentStatus::*;
    let today = now.date_naive();
    ShipmentStats {
        active: shipments.iter().filter(|s| s.is_active()).count(),
        pending: shipments
            .iter()
            .filter(|s| matches!(s.status, Pending | Approved))
            .count(),
        in_transit: shipments
            .iter()
            .filter(|s| matches!(s.status, InTransit | AtDistributionCenter | OutForDelivery))
            .count(),
        delivered_today: shipments
            .iter()
            .filter(|s| {
                s.status == Delivered
                    && s.actual_delivery.is_some_and(|d| d.date_naive() == today)
            })
            .count(),
    }
}

fn category_fulfillment(needs: &[&Need]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for n in needs {
        let entry = totals.entry(n.category.clone()).or_default();
        entry.0 += u64::from(n.quantity_fulfilled);
        entry.1 += u64::from(n.quantity_required);
    }
    totals
        .into_iter()
        .map(|(category, (fulfilled, required))| {
            let pct = if required == 0 {
                0.0
            } else {
                fulfilled as f64 / required as f64 * 100.0
            };
            (category, pct)
        })
        .collect()
}

fn category_allocatable(supplies: &[&Supply]) -> BTreeMap<String, u64> {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for s in supplies {
        *totals.entry(s.category.clone()).or_default() += u64::from(s.allocatable());
    }
    totals
}
