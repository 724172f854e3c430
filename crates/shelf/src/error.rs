type Cause = Box<dyn std::error::Error + Send + Sync>;

/// The error returned when a book search fails.
///
/// Every failure of a search is the same failure to the caller - the search did not produce a
/// result set - the [`ErrorKind`] only records where along the way it went wrong.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    detail: Option<String>,
    cause: Option<Cause>,
}

/// The stage of a search that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be sent or the response could not be read.
    IO,
    /// The API answered with a non-success HTTP status.
    Status,
    /// The response body was not the expected JSON, including a missing `items` array.
    Deserialize,
}

impl ErrorKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::IO => "IO error",
            Self::Status => "HTTP status error",
            Self::Deserialize => "Deserialize error",
        }
    }
}

impl Error {
    /// A failed search at the `kind` stage, explained by `detail`.
    pub fn new<S: Into<String>>(kind: ErrorKind, detail: S) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
            cause: None,
        }
    }

    /// A failed search at the `kind` stage caused by an error from the HTTP client or JSON
    /// decoder.
    pub fn wrap<E>(kind: ErrorKind, cause: E) -> Self
    where
        E: Into<Cause>,
    {
        Self {
            kind,
            detail: None,
            cause: Some(cause.into()),
        }
    }

    /// The stage of the search that failed.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "search failed: {}", self.kind.describe())?;

        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }

        if let Some(cause) = &self.cause {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| &**e as _)
    }
}
