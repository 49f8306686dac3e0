pub mod core;
pub mod logging;

// Convenience re-export for callers and tests
pub use core::proxy;
