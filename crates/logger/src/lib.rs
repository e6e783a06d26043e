//! Logging setup shared by the Uppe binaries.

mod subscriber;

pub use subscriber::{init, level_for_verbosity};
