//! # routemap-core
//!
//! Route map integrity and validation.
//!
//! This crate provides:
//! - a single-pass loader that decodes a route map while computing its
//!   SHA-1 digest and keeping the exact raw bytes
//! - the route map document model
//! - CIDR and label validators
//! - a whole-document validator that collects every error into a
//!   [`MultiError`] and gathers a [`RouteMapSummary`]
//!
//! ## Data flow
//!
//! ```text
//! file / stdin
//!     │  DigestingReader (sha1 + raw capture)
//!     ▼
//! LoadedRouteMap { RouteMap, digest, raw, size }
//!     │  Validator
//!     ▼
//! ValidationReport { RouteMapSummary, MultiError<ValidationError> }
//! ```
//!
//! Uploading, listing and rendering are left to callers.

pub mod error;
pub mod labels;
pub mod loader;
pub mod model;
pub mod multi_error;
pub mod network;
pub mod summary;
pub mod validator;
pub mod verbosity;

pub use error::{CidrParseError, LoadError, NetworkError, ValidationError};
pub use labels::validate_labels;
pub use loader::{
    DigestingReader, LoadedRouteMap, STDIN_SOURCE_NAME, Sha1Digest, load_path,
    load_path_or_stdin, load_reader, load_stdin,
};
pub use model::{
    MAX_NETWORK_BITS_V4, MAX_NETWORK_BITS_V6, MetaValue, RouteMap, SUPPORTED_VERSION, Segment,
};
pub use multi_error::MultiError;
pub use network::{
    Cidr, Netmask, NetmaskPolicy, NetworkCheck, check_alignment, check_netmask_len,
    validate_network, validate_networks,
};
pub use summary::RouteMapSummary;
pub use validator::{
    DEFAULT_PROGRESS_INTERVAL, ValidationReport, Validator, ValidatorConfig, validate,
    validate_version,
};
pub use verbosity::Verbosity;
