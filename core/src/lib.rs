pub mod builder;
pub mod config;
pub mod duration;
pub mod model;
pub mod scoring;

pub use config::Config;
pub use model::{Item, PickCommitment, Picklist, PicklistType};
