//! Configuration for SplitLedger
//!
//! Path resolution for the data directory and the persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::SplitPaths;
pub use settings::Settings;
