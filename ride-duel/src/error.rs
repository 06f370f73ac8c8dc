use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("failed to parse GPX document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, DuelError>;
