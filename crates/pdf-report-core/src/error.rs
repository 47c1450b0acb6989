use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No data provided")]
    NoData,

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("request body must be a JSON object")]
    NotAnObject,
}
