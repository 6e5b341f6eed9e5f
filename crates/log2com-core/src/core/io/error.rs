use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line {line})")]
    Parse {
        format: &'static str,
        line: usize,
        details: String,
    },

    #[error("no geometry found in {0} data")]
    MissingGeometry(&'static str),

    #[error("the optimization never reached a stationary point")]
    NotConverged,

    #[error("no geometry reader registered for extension '{0}'")]
    UnsupportedExtension(String),

    #[error("unknown job setting '{0}'")]
    UnknownSetting(String),
}

impl IoError {
    pub fn parse(format: &'static str, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }
}
