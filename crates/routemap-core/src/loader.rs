//! Single-pass route map loading.
//!
//! The source is read exactly once. Every chunk pulled from it is fed to a
//! SHA-1 accumulator and appended to a raw capture before the JSON decoder
//! sees it, so the digest, the raw bytes, and the decoded document always
//! describe the same byte stream.

use crate::error::LoadError;
use crate::model::RouteMap;
use serde_json::error::Category;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Name used for the standard input source in error messages.
pub const STDIN_SOURCE_NAME: &str = "<stdin>";

/// SHA-1 fingerprint of the raw route map bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha1Digest(pub [u8; 20]);

impl Sha1Digest {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({self})")
    }
}

/// Reader tap that hashes and captures every byte it forwards.
pub struct DigestingReader<R> {
    inner: R,
    hasher: Sha1,
    captured: Vec<u8>,
}

impl<R: Read> DigestingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha1::new(),
            captured: Vec::new(),
        }
    }

    /// Bytes forwarded so far.
    pub fn captured(&self) -> &[u8] {
        &self.captured
    }

    /// Finalize the digest and hand back the raw capture.
    pub fn finish(self) -> (Sha1Digest, Vec<u8>) {
        let hash = self.hasher.finalize();
        let mut digest = [0u8; 20];
        digest.copy_from_slice(&hash);
        (Sha1Digest(digest), self.captured)
    }
}

impl<R: Read> Read for DigestingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let chunk = &buf[..n];
        self.hasher.update(chunk);
        self.captured.extend_from_slice(chunk);
        Ok(n)
    }
}

/// A decoded route map together with the attributes of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedRouteMap {
    document: RouteMap,
    digest: Sha1Digest,
    raw: Vec<u8>,
    size_in_bytes: usize,
}

impl LoadedRouteMap {
    pub fn document(&self) -> &RouteMap {
        &self.document
    }

    pub fn into_document(self) -> RouteMap {
        self.document
    }

    pub fn digest(&self) -> Sha1Digest {
        self.digest
    }

    pub fn digest_hex(&self) -> String {
        self.digest.to_hex()
    }

    /// Exact input bytes, or an empty slice once released.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Length of the input in bytes. Unaffected by [`Self::release_raw`].
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn raw_released(&self) -> bool {
        self.raw.is_empty() && self.size_in_bytes > 0
    }

    /// Drop the raw capture to bound memory on large documents.
    pub fn release_raw(&mut self) {
        self.raw = Vec::new();
    }
}

/// Load a route map from any reader, tagging errors with `source_name`.
pub fn load_reader<R: Read>(source: R, source_name: &str) -> Result<LoadedRouteMap, LoadError> {
    let mut tap = DigestingReader::new(source);
    let decoded = serde_json::from_reader::<_, RouteMap>(BufReader::new(&mut tap));
    let (digest, raw) = tap.finish();

    let document = decoded.map_err(|error| decode_error(error, &raw, source_name))?;
    let size_in_bytes = raw.len();

    Ok(LoadedRouteMap {
        document,
        digest,
        raw,
        size_in_bytes,
    })
}

/// Load a route map from a file on disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<LoadedRouteMap, LoadError> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|error| LoadError::Io {
        source_name: source_name.clone(),
        error,
    })?;
    load_reader(file, &source_name)
}

pub fn load_stdin() -> Result<LoadedRouteMap, LoadError> {
    load_reader(io::stdin().lock(), STDIN_SOURCE_NAME)
}

/// Load from the named file, or from standard input when no path is given.
pub fn load_path_or_stdin(path: Option<&Path>) -> Result<LoadedRouteMap, LoadError> {
    match path {
        Some(path) => load_path(path),
        None => load_stdin(),
    }
}

fn decode_error(error: serde_json::Error, raw: &[u8], source_name: &str) -> LoadError {
    match error.classify() {
        Category::Io => LoadError::Io {
            source_name: source_name.to_string(),
            error: io::Error::from(error),
        },
        Category::Syntax | Category::Eof => LoadError::Syntax {
            offset: byte_offset(raw, error.line(), error.column()),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        },
        Category::Data => LoadError::Decode {
            message: error.to_string(),
        },
    }
}

/// Translate a 1-based line and column into a byte offset within `raw`.
fn byte_offset(raw: &[u8], line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        raw.iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .nth(line - 2)
            .map(|(idx, _)| idx + 1)
            .unwrap_or(raw.len())
    };
    (line_start + column).min(raw.len())
}
