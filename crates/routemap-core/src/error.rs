//! Error types for route map loading and validation.

/// Fatal failures while loading a route map. No document is produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("reading {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    /// The bytes are not well-formed JSON.
    #[error("parsing route map: {message} (byte offset {offset})")]
    Syntax {
        message: String,
        offset: usize,
        line: usize,
        column: usize,
    },

    /// Well-formed JSON that does not have the route map shape.
    #[error("decoding route map: {message}")]
    Decode { message: String },
}

/// Why a CIDR string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrParseError {
    #[error("missing prefix length")]
    MissingPrefix,

    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("invalid prefix length `{0}`")]
    InvalidPrefix(String),

    #[error("prefix length {prefix} exceeds {max} bits")]
    PrefixOutOfRange { prefix: u32, max: u8 },
}

/// A problem with a single network entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("unparsable network address: {0}")]
    Unparsable(#[from] CidrParseError),

    #[error("network address not properly masked")]
    NotMasked,

    #[error("invalid network mask")]
    InvalidMask,

    #[error("network bits {bits} > {max} (max)")]
    PrefixTooLong { bits: u8, max: u8 },
}

/// A validation failure, located within the document.
///
/// Only the version variants are fatal; every other variant is collected
/// and the scan continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid or missing meta/version")]
    InvalidVersion,

    #[error("unsupported meta/version [value={0}]")]
    UnsupportedVersion(i64),

    #[error("map segment at index {segment} has no networks defined")]
    NoNetworks { segment: usize },

    #[error("{error} (for CIDR \"{cidr}\" at index={index}, map segment index={segment})")]
    Network {
        error: NetworkError,
        cidr: String,
        index: usize,
        segment: usize,
    },

    #[error("empty labels list (at map segment index={segment})")]
    EmptyLabels { segment: usize },

    #[error("empty or whitespace-only label (at index={index}, map segment index={segment})")]
    BlankLabel { index: usize, segment: usize },

    #[error("label with non-ASCII characters (at index={index}, map segment index={segment})")]
    NonAsciiLabel { index: usize, segment: usize },

    #[error("duplicate label \"{label}\" (at index={index}, map segment index={segment})")]
    DuplicateLabel {
        label: String,
        index: usize,
        segment: usize,
    },
}

impl ValidationError {
    /// Whether this error short-circuits the whole validation run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ValidationError::InvalidVersion | ValidationError::UnsupportedVersion(_)
        )
    }

    /// Map segment index the error points at, if any.
    pub fn segment(&self) -> Option<usize> {
        match self {
            ValidationError::InvalidVersion | ValidationError::UnsupportedVersion(_) => None,
            ValidationError::NoNetworks { segment }
            | ValidationError::Network { segment, .. }
            | ValidationError::EmptyLabels { segment }
            | ValidationError::BlankLabel { segment, .. }
            | ValidationError::NonAsciiLabel { segment, .. }
            | ValidationError::DuplicateLabel { segment, .. } => Some(*segment),
        }
    }
}
