use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Delivery error: {0}")]
    Notify(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SummaryError>,
    },
}

/// Coarse classification of a [`SummaryError`], stable across context wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Storage,
    NotFound,
    InvalidArgument,
    Config,
    Delivery,
}

impl SummaryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Db(_) | Self::Storage(_) => ErrorKind::Storage,
            // Reading the input file is part of parsing; writing the outbox is delivery.
            Self::Io(_) | Self::Csv(_) | Self::Parse(_) => ErrorKind::Parse,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Settings(_) => ErrorKind::Config,
            Self::Notify(_) => ErrorKind::Delivery,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// Prefix the error with what was being attempted. The kind is preserved.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// `.context(..)` on any `Result` whose error converts into [`SummaryError`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: Into<SummaryError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Into::<SummaryError>::into(e).context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Into::<SummaryError>::into(e).context(f()))
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
