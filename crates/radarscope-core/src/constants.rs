//! Simulation constants and tuning parameters.

// --- Speeds ---

/// Nominal cruise ground speed (knots).
pub const CRUISE_SPEED_KT: f64 = 95.0;

/// Ground speed on final approach (knots).
pub const APPROACH_SPEED_KT: f64 = 90.0;

/// Reduced ground speed during commanded climbs and descents (knots).
pub const ALTITUDE_CHANGE_SPEED_KT: f64 = 90.0;

// --- Rates ---

/// Standard turn rate (degrees per second).
pub const TURN_RATE_DEG_PER_SEC: f64 = 3.0;

/// Climb rate for general maneuvers (feet per minute).
pub const CLIMB_RATE_FPM: f64 = 500.0;

/// Descent rate for general maneuvers (feet per minute).
pub const DESCENT_RATE_FPM: f64 = 500.0;

/// Descent rate on final approach (feet per minute).
pub const FINAL_APPROACH_DESCENT_FPM: f64 = 500.0;

// --- Random maneuvers ---

/// Minimum time in CRUISE before the transition table is consulted (seconds).
pub const CRUISE_DWELL_SECS: f64 = 5.0;

/// Probability that a cruise roll starts a turn.
pub const CRUISE_TURN_PROBABILITY: f64 = 0.05;

/// Number of candidate headings for a random turn (multiples of 10°).
pub const RANDOM_HEADING_SLOTS: u32 = 36;

/// Spacing of the candidate headings (degrees).
pub const RANDOM_HEADING_STEP_DEG: f64 = 10.0;

// --- Approach and landing ---

/// Stabilized approach gradient: nautical miles of range per 1000 ft to lose.
pub const APPROACH_NM_PER_1000_FT: f64 = 3.0;

/// Distance from the approach fix at which the final turn begins (nm).
pub const APPROACH_CAPTURE_RADIUS_NM: f64 = 0.5;

/// Height above field elevation to climb to after a touch-and-go (feet).
pub const CIRCUIT_ALTITUDE_FT: f64 = 1000.0;

// --- Forced maneuvers ---

/// Altitude change applied by a commanded climb or descent (feet).
pub const FORCED_ALTITUDE_CHANGE_FT: f64 = 1000.0;

/// A commanded descent never targets below field elevation plus this (feet).
pub const MIN_DESCENT_HEIGHT_FT: f64 = 500.0;

// --- Trails ---

/// Maximum number of prior positions retained for trail rendering.
pub const MAX_HISTORY_POSITIONS: usize = 10;

// --- Fuel ---

/// Default fuel load for spawned aircraft (US gallons).
pub const DEFAULT_FUEL_GAL: f64 = 40.0;

/// Default linear burn rate (US gallons per hour).
pub const DEFAULT_FUEL_BURN_GPH: f64 = 8.5;

// --- Tick driver ---

/// Default interval between ticks (milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2000;

/// Upper bound for the tick driver's time scale.
pub const MAX_TIME_SCALE: f64 = 8.0;

// --- Numerics ---

/// Tolerance used when deciding a heading target has been reached (degrees).
pub const HEADING_EPSILON_DEG: f64 = 1e-9;

/// Tolerance used when deciding an altitude target has been reached (feet).
pub const ALTITUDE_EPSILON_FT: f64 = 1e-6;
