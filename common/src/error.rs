use thiserror::Error;

/// Errors raised by the ambient collaborators (loader, report).
///
/// The optimizer core (duration model, scoring model, builder, scheduler)
/// never raises this: per the design, every outcome there is data, not an
/// exception.
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("malformed input row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("unknown priority code: {0}")]
    UnknownPriority(String),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse csv: {0}")]
    Csv(#[from] csv::Error),
}
