//! Domain types produced by task generation

mod priority;
mod task;

pub use priority::Priority;
pub use task::TaskRecord;
