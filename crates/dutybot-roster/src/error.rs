use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to open file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create file {}: {source}", path.display())]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error reading file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse date {input:?}: {source}")]
    DateParse {
        input: String,
        source: chrono::ParseError,
    },
    #[error("invalid date format: {pic}")]
    InvalidDateFormat { pic: String },
    #[error("PIC not found: {pic}")]
    PicNotFound { pic: String },
    #[error("no previous PIC found before {pic}")]
    PreviousPicNotFound { pic: String },
    #[error("failed to write schedule: {pic}: {source}")]
    WriteSchedule {
        pic: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RosterError>;
