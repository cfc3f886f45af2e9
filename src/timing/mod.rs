// ============================================================================
// frp-signals - Timing Module
// The scheduler seam, the built-in event loop, and timer-driven sources
// ============================================================================

pub mod event_loop;
pub mod scheduler;
pub mod timed;

pub use event_loop::{ClockMode, EventLoop, LoopConfig};
pub use scheduler::{CancelToken, Scheduler, Task, TimerId};
pub use timed::{delay, delay_with_token, every, every_with_token, since};
