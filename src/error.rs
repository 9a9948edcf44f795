use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe output is not a JSON document of the expected shape.
    #[error("failed to deserialize probe output: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The probe command ran and exited unsuccessfully; carries its stderr.
    #[error("probe command failed: {0}")]
    Invocation(String),

    #[error("failed to run probe command: {0}")]
    Spawn(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
