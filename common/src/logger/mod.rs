mod init;
mod trace_id;

pub use init::init_tracing;
pub use trace_id::RunId;
