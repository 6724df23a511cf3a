use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("query is empty")]
    EmptyQuery,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
