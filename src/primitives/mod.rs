// ============================================================================
// frp-signals - Primitives Module
// The reactive cell and the channel that feeds it from outside
// ============================================================================

pub mod channel;
pub mod signal;

pub use channel::{channel, send, signal, Channel};
pub use signal::{constant, get, make, set, subscribe, Signal};
