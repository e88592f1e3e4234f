//! CLI commands for the bytebpe trainer.

pub mod boundaries;
pub mod train;

pub use boundaries::BoundariesCommand;
pub use train::TrainCommand;
