pub mod metrics;
pub mod persist;

pub use metrics::Metrics;
