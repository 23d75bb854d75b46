//! Audio capture adapters

pub mod arbiter;
pub mod keys;
pub mod sox;

pub use arbiter::{wait_for_stop, StopReason};
pub use keys::StopKeyListener;
pub use sox::SoxRecorder;
