//! System-wide constants for the reliefmatch allocation engine.

/// Earth radius used by the Haversine distance computation, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distances beyond this contribute no proximity score (default).
pub const DEFAULT_MAX_PROXIMITY_DISTANCE_KM: f64 = 100.0;

/// Multiplier on the proximity sub-score (default).
pub const DEFAULT_PROXIMITY_WEIGHT: f64 = 0.3;

/// Multiplier on the category sub-score (default).
pub const DEFAULT_CATEGORY_MATCH_WEIGHT: f64 = 0.5;

/// Reject partial allocations whose first slice is below this percentage
/// of the need's required quantity (default).
pub const DEFAULT_MIN_PARTIAL_FULFILLMENT_PERCENT: f64 = 10.0;

/// Weight of the stock-ratio bonus in the match score.
pub const STOCK_RATIO_WEIGHT: f64 = 0.2;

/// Bonus for supplies expiring within the soon window (use perishables first).
pub const EXPIRING_SOON_BONUS: f64 = 0.1;

/// Window for "expiring soon", in days.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 7;

/// Default aging threshold: hours before a Low-priority need starts escalating.
pub const DEFAULT_LOW_TO_MEDIUM_HOURS: f64 = 24.0;

/// Default aging threshold: hours before a Medium-priority need starts escalating.
pub const DEFAULT_MEDIUM_TO_HIGH_HOURS: f64 = 12.0;

/// Default aging threshold: hours before a High-priority need starts escalating.
pub const DEFAULT_HIGH_TO_CRITICAL_HOURS: f64 = 6.0;

/// Emergency-preset aging thresholds (Low→Medium / Medium→High / High→Critical).
pub const EMERGENCY_LOW_TO_MEDIUM_HOURS: f64 = 6.0;
pub const EMERGENCY_MEDIUM_TO_HIGH_HOURS: f64 = 3.0;
pub const EMERGENCY_HIGH_TO_CRITICAL_HOURS: f64 = 1.0;

/// Deadline bonus when the deadline has passed (hours-until ≤ 0).
pub const DEADLINE_PAST_BONUS: f64 = 2.0;

/// Deadline bonus when the deadline is within 6 hours.
pub const DEADLINE_IMMINENT_BONUS: f64 = 1.0;

/// Deadline bonus when the deadline is within 24 hours.
pub const DEADLINE_NEAR_BONUS: f64 = 0.5;

/// Fulfillment percentage at which the near-completion bonus applies.
pub const NEAR_COMPLETION_THRESHOLD_PERCENT: f64 = 80.0;

/// Bonus for needs at or past the near-completion threshold.
pub const NEAR_COMPLETION_BONUS: f64 = 0.5;

/// Hours a starved effectively-Critical need must wait before it trips
/// panic detection (default).
pub const DEFAULT_PANIC_THRESHOLD_HOURS: f64 = 1.0;

/// Number of top critical missing items reported by the dashboard (default).
pub const DEFAULT_TOP_CRITICAL_COUNT: usize = 5;

/// Maximum audit entries retained in memory before oldest are dropped
/// (default).
pub const DEFAULT_MAX_IN_MEMORY_LOGS: usize = 1000;

/// Prefix for shipment tracking codes.
pub const TRACKING_CODE_PREFIX: &str = "DL";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "reliefmatch";
