// ============================================================================
// frp-signals - Constants
// ============================================================================

use std::time::Duration;

/// Delay used for the one-shot announcement of a derived signal's seed.
/// Zero means "on the next turn of the scheduler".
pub const SEED_ANNOUNCE_DELAY: Duration = Duration::ZERO;

/// Upper bound on timers fired by a single `EventLoop` drive call.
/// Guards against zero-period `every` sources spinning forever.
pub const DEFAULT_MAX_FIRES_PER_RUN: usize = 1_000_000;
