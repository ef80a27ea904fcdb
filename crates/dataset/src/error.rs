use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read the trade log: {0}")]
    Io(#[from] std::io::Error),

    #[error("The trade log is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Failed to parse the trade log header: {0}")]
    Header(#[source] csv::Error),

    #[error("Malformed trade on line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid entry time on line {line}: '{value}'")]
    EntryTime { line: u64, value: String },
}
