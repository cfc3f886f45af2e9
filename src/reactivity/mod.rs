// ============================================================================
// frp-signals - Reactivity Module
// Notification passes and value comparison
// ============================================================================

pub mod equality;
pub mod propagation;

pub use propagation::{write, PassOutcome};
