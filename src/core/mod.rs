// ============================================================================
// frp-signals - Core Module
// Node type, errors, and the thread-local runtime context
// ============================================================================

pub mod constants;
pub mod context;
pub mod error;
pub mod types;

pub use context::{
    current_scheduler, event_loop, install_scheduler, propagation_depth, set_scheduler,
    with_context, RuntimeContext, SchedulerGuard,
};
pub use error::{PropagationError, PropagationResult};
pub use types::{SignalId, SignalInner, Subscriber, SubscriberKind, Thunk};
