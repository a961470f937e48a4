use std::path::PathBuf;

/// Errors from building a board out of a diagram, a raw grid or injected side lists.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("board size {0} is not supported (expected an even size from 4 to 16)")]
    UnsupportedSize(usize),

    #[error("expected {expected} rows but the grid has {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells but the board is {expected} wide")]
    RowWidth { row: usize, expected: usize, actual: usize },

    #[error("encountered unexpected character '{0}' while reading the diagram")]
    UnexpectedChar(char),

    #[error("square ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("square ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors for console lines that could not be understood.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("expected a square as '<row> <col>' but got '{0}'")]
    BadSquare(String),

    #[error("square ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("bad diagram: {0}")]
    Diagram(#[from] BoardError),

    #[error("failed to write reply: {0}")]
    Io(#[from] std::io::Error),
}
