//! Maps any failure reaching the command boundary to an exit code and a
//! `{code, message}` JSON error payload: 0 success, 1 validation error,
//! 2 infeasible inputs, 3 internal error.

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Infeasible(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 1,
            CliError::Infeasible(_) => 2,
            CliError::Internal(_) => 3,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Validation(_) => "VALIDATION_ERROR",
            CliError::Infeasible(_) => "INFEASIBLE",
            CliError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<flo_core::error::ModelError> for CliError {
    fn from(err: flo_core::error::ModelError) -> Self {
        use flo_core::error::ModelError;
        match err {
            ModelError::InvalidField { .. } | ModelError::InvalidCrop { .. } | ModelError::InvalidProfile { .. } | ModelError::WindowOutsideWeather { .. } => {
                CliError::Validation(err.to_string())
            }
            ModelError::InsufficientWeather { .. } => CliError::Infeasible(err.to_string()),
            ModelError::InvariantBreach(_) => CliError::Internal(anyhow::anyhow!(err)),
        }
    }
}
