//! Error enum
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    Serde(serde_json::Error),
    Regex(regex::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    FastText(String),
    Custom(String),

    /// A transcript-prefixed archive member whose name holds no usable date.
    MalformedArchiveEntry { name: String, reason: String },
    /// A transcript that could not be parsed or lacks its sitting date.
    MalformedDocument { name: String, reason: String },
    /// The tagging backend refused a text.
    Tagging(String),
    /// One annotator input could not be annotated. Recoverable.
    AnnotationBackend { position: usize, reason: String },
    /// An annotated record points outside of the year's URI index.
    UnresolvedPosition { position: usize, len: usize },
    /// A shard was opened while another one was still open.
    ShardAlreadyOpen { open: i32, requested: i32 },
    /// A write or close was attempted with no shard open.
    NoOpenShard,
}

impl Error {
    /// Errors that signal a broken alignment or year segmentation invariant.
    ///
    /// These abort the current year instead of being skipped.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MalformedArchiveEntry { .. }
                | Error::MalformedDocument { .. }
                | Error::AnnotationBackend { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Zip(e) => write!(f, "zip error: {e}"),
            Error::Xml(e) => write!(f, "xml error: {e}"),
            Error::Serde(e) => write!(f, "serialization error: {e}"),
            Error::Regex(e) => write!(f, "invalid pattern: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Error::FastText(e) => write!(f, "fasttext error: {e}"),
            Error::Custom(e) => write!(f, "{e}"),
            Error::MalformedArchiveEntry { name, reason } => {
                write!(f, "malformed archive entry {name}: {reason}")
            }
            Error::MalformedDocument { name, reason } => {
                write!(f, "malformed document {name}: {reason}")
            }
            Error::Tagging(reason) => write!(f, "tagging failed: {reason}"),
            Error::AnnotationBackend { position, reason } => {
                write!(f, "could not annotate input {position}: {reason}")
            }
            Error::UnresolvedPosition { position, len } => write!(
                f,
                "annotated record points to position {position} but only {len} uris are known"
            ),
            Error::ShardAlreadyOpen { open, requested } => write!(
                f,
                "cannot open shard for {requested}: shard for {open} is still open"
            ),
            Error::NoOpenShard => write!(f, "no shard is open"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Error {
        Error::Zip(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Error {
        Error::Xml(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Error {
        Error::Regex(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
