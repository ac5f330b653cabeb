use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    InvalidArgument,
    InvalidState,
    LockMisuse,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn lock_misuse(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::LockMisuse, context.into())
    }

    pub fn invalid_argument(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidArgument, context.into())
    }

    pub fn invalid_state(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidState, context.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_io() { ErrorKind::Io } else { ErrorKind::Parse };
        Error {
            kind,
            context: format!("JSON error: {}", err),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error {
            kind: ErrorKind::InvalidArgument,
            context: format!("Invalid URL: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_context() {
        let err = Error::lock_misuse("released twice");
        assert_eq!(err.to_string(), "LockMisuse: released twice");
    }

    #[test]
    fn conversions_pick_kinds() {
        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io.kind, ErrorKind::Io);

        let json: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(json.kind, ErrorKind::Parse);

        let url: Error = url::Url::parse("not a url").unwrap_err().into();
        assert_eq!(url.kind, ErrorKind::InvalidArgument);
    }
}
