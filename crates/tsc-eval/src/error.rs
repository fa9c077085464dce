use thiserror::Error;

use tsc_core::{CoreError, TickRange};
use tsc_output::OutputError;
use tsc_traffic::TrafficError;

/// Every failure that can abort an evaluation run.
///
/// Lower-level errors are wrapped unmodified; nothing is retried.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("evaluation configuration error: {0}")]
    Config(String),

    #[error("configured horizon {configured} does not match the environment's {environment}")]
    HorizonMismatch {
        configured:  TickRange,
        environment: TickRange,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("simulator error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

pub type EvalResult<T> = Result<T, EvalError>;
