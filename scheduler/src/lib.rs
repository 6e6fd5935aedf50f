pub mod engine;
pub mod pool;
pub mod types;

pub use engine::assign;
pub use pool::PickerPool;
pub use types::{Assignment, AssignmentStatus, Picker};
