// ============================================================================
// frp-signals - Push-based Functional Reactive Signals for Rust
// ============================================================================
//
// Signals are single-threaded cells that push every write to their
// subscribers, synchronously and in subscription order. Combinators derive
// new signals from existing ones; timed sources and channels feed values in
// from the scheduler and from outside the graph.
// ============================================================================

pub mod combinators;
pub mod core;
pub mod primitives;
pub mod reactivity;
pub mod timing;

// Re-export core items at crate root
pub use crate::core::constants;
pub use crate::core::context::{
    current_scheduler, event_loop, install_scheduler, propagation_depth, set_scheduler,
    SchedulerGuard,
};
pub use crate::core::error::{PropagationError, PropagationResult};
pub use crate::core::types::{SignalId, Thunk};

// Re-export primitives
pub use primitives::channel::{channel, send, signal, Channel};
pub use primitives::signal::{constant, get, make, set, subscribe, Signal};

// Re-export combinators
pub use combinators::{
    apply, drop_repeats, drop_repeats_by, filter, flat_map, flatten, foldp, map, merge, on, run,
    sample_on, unwrap,
};

// Re-export equality helpers
pub use reactivity::equality::{by_key, equals, never_equals, safe_equals_f32, safe_equals_f64};

// Re-export timing
pub use timing::event_loop::{ClockMode, EventLoop, LoopConfig};
pub use timing::scheduler::{CancelToken, Scheduler, Task, TimerId};
pub use timing::timed::{delay, delay_with_token, every, every_with_token, since};

// =============================================================================
// TESTS
// =============================================================================
