//! Whole-document route map validation.
//!
//! The scan runs in three steps:
//!
//! ```text
//! version check ──fail──▶ one fatal error, zero summary
//!      │
//!      ├── no segments ──▶ accepted, zero summary
//!      │
//!      └── scan every segment in order, collecting all errors
//! ```
//!
//! Only the version check short-circuits. A segment without networks is an
//! error for that segment, and the scan moves on to the next one.

use crate::error::{LoadError, ValidationError};
use crate::labels::validate_labels;
use crate::loader::{LoadedRouteMap, load_path_or_stdin};
use crate::model::{RouteMap, SUPPORTED_VERSION};
use crate::multi_error::MultiError;
use crate::network::{NetmaskPolicy, validate_networks};
use crate::summary::RouteMapSummary;
use crate::verbosity::Verbosity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, trace};

/// Networks visited between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    pub policy: NetmaskPolicy,
    /// Report progress each time this many more networks were visited.
    /// Zero disables progress reports.
    pub progress_interval: usize,
    pub verbosity: Verbosity,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            policy: NetmaskPolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            verbosity: Verbosity::default(),
        }
    }
}

/// Everything a validation run produces.
///
/// The summary is returned whether or not validation succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub summary: RouteMapSummary,
    pub errors: MultiError<ValidationError>,
}

impl ValidationReport {
    pub fn accepted(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the run stopped at a fatal error.
    pub fn is_fatal(&self) -> bool {
        self.errors.iter().any(ValidationError::is_fatal)
    }

    pub fn into_result(self) -> Result<RouteMapSummary, MultiError<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.summary)
        } else {
            Err(self.errors)
        }
    }
}

/// Check a coerced `meta.version` against the supported version.
pub fn validate_version(version: Option<i64>) -> Result<(), ValidationError> {
    match version {
        None => Err(ValidationError::InvalidVersion),
        Some(v) if v < 1 => Err(ValidationError::InvalidVersion),
        Some(SUPPORTED_VERSION) => Ok(()),
        Some(v) => Err(ValidationError::UnsupportedVersion(v)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a whole document.
    ///
    /// Holds no state between calls; validating the same document twice
    /// gives identical reports.
    pub fn validate(&self, map: &RouteMap) -> ValidationReport {
        let mut summary = RouteMapSummary::new();

        if let Err(error) = validate_version(map.meta_version()) {
            return ValidationReport {
                summary,
                errors: MultiError::from(error),
            };
        }

        let num_segments = map.segments.len();
        if num_segments == 0 {
            if self.enabled(Verbosity::Info) {
                info!("route map is empty; skipping all validation");
            }
            return ValidationReport {
                summary,
                errors: MultiError::new(),
            };
        }

        let mut errors = MultiError::new();
        let mut progress = Progress::new(self.config.progress_interval);

        for (idx, segment) in map.segments.iter().enumerate() {
            if self.enabled(Verbosity::Trace) {
                trace!(
                    "visiting map segment at index {idx} (networks={}, labels={})",
                    segment.networks.len(),
                    segment.labels.len()
                );
            }

            if segment.networks.is_empty() {
                errors.push(ValidationError::NoNetworks { segment: idx });
                continue;
            }

            errors.append(validate_networks(
                &segment.networks,
                idx,
                &self.config.policy,
                &mut summary,
            ));
            errors.append(validate_labels(&segment.labels, idx, &mut summary));

            if progress.crossed(summary.num_networks) && self.enabled(Verbosity::Debug) {
                debug!(
                    "validation progress: at map segment index {idx}/{num_segments}; networks visited = {}, errors = {}",
                    summary.num_networks,
                    errors.len()
                );
            }
        }

        ValidationReport { summary, errors }
    }

    /// Load from `path` (or stdin when `None`) and validate the result.
    pub fn load_and_validate(
        &self,
        path: Option<&Path>,
    ) -> Result<(LoadedRouteMap, ValidationReport), LoadError> {
        let loaded = load_path_or_stdin(path)?;
        if self.enabled(Verbosity::Debug) {
            debug!(
                "loaded route map: {} bytes, sha1 {}",
                loaded.size_in_bytes(),
                loaded.digest()
            );
        }
        let report = self.validate(loaded.document());
        Ok((loaded, report))
    }

    fn enabled(&self, level: Verbosity) -> bool {
        self.config.verbosity.enabled(level)
    }
}

/// Validate with the default policy and verbosity.
pub fn validate(map: &RouteMap) -> ValidationReport {
    Validator::default().validate(map)
}

/// Fires once each time a running count crosses a multiple of `interval`.
#[derive(Debug, Clone, Copy)]
struct Progress {
    interval: usize,
    reported_bucket: usize,
}

impl Progress {
    fn new(interval: usize) -> Self {
        Self {
            interval,
            reported_bucket: 0,
        }
    }

    fn crossed(&mut self, count: usize) -> bool {
        if self.interval == 0 {
            return false;
        }
        let bucket = count / self.interval;
        if bucket > self.reported_bucket {
            self.reported_bucket = bucket;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;

    fn segment(networks: &[&str], labels: &[&str]) -> Segment {
        Segment {
            networks: networks.iter().map(|s| s.to_string()).collect(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn route_map(version: i64, segments: Vec<Segment>) -> RouteMap {
        let mut map = RouteMap {
            segments,
            ..RouteMap::default()
        };
        map.set_meta_version(version);
        map
    }

    #[test]
    fn version_rules() {
        assert_eq!(validate_version(Some(1)), Ok(()));
        assert_eq!(validate_version(None), Err(ValidationError::InvalidVersion));
        assert_eq!(validate_version(Some(0)), Err(ValidationError::InvalidVersion));
        assert_eq!(validate_version(Some(-1)), Err(ValidationError::InvalidVersion));
        assert_eq!(
            validate_version(Some(2)),
            Err(ValidationError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn unsupported_version_short_circuits() {
        let map = route_map(2, vec![segment(&["10.0.0.1/8"], &[])]);
        let report = validate(&map);

        assert!(report.is_fatal());
        assert_eq!(
            report.errors.errors(),
            &[ValidationError::UnsupportedVersion(2)]
        );
        assert_eq!(
            report.errors.to_string(),
            "unsupported meta/version [value=2]"
        );
        assert_eq!(report.summary, RouteMapSummary::default());
    }

    #[test]
    fn missing_version_is_fatal() {
        let map = RouteMap {
            segments: vec![segment(&["10.0.0.0/8"], &["a"])],
            ..RouteMap::default()
        };
        let report = validate(&map);
        assert_eq!(report.errors.errors(), &[ValidationError::InvalidVersion]);
        assert_eq!(report.summary.num_networks, 0);
    }

    #[test]
    fn empty_document_is_accepted() {
        let report = validate(&route_map(1, Vec::new()));
        assert!(report.accepted());
        assert_eq!(report.summary, RouteMapSummary::default());
    }

    #[test]
    fn case_insensitive_duplicate_is_reported_with_counts() {
        let map = route_map(1, vec![segment(&["10.0.0.0/8"], &["a", "A"])]);
        let report = validate(&map);

        assert!(!report.accepted());
        assert!(!report.is_fatal());
        assert_eq!(
            report.errors.errors(),
            &[ValidationError::DuplicateLabel {
                label: "A".into(),
                index: 1,
                segment: 0
            }]
        );
        assert_eq!(report.summary.num_networks, 1);
        assert_eq!(report.summary.num_ipv4, 1);
        assert_eq!(report.summary.num_ipv6, 0);
    }

    #[test]
    fn segment_without_networks_does_not_stop_the_scan() {
        let map = route_map(
            1,
            vec![
                segment(&[], &["skipped"]),
                segment(&["10.0.0.1/8", "2001:db8::/32"], &["edge"]),
                segment(&["192.0.2.0/24"], &[]),
            ],
        );
        let report = validate(&map);

        let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "map segment at index 0 has no networks defined",
                "network address not properly masked (for CIDR \"10.0.0.1/8\" at index=0, map segment index=1)",
                "empty labels list (at map segment index=2)",
            ]
        );
        assert_eq!(report.summary.num_networks, 3);
        assert_eq!(report.summary.num_ipv4, 2);
        assert_eq!(report.summary.num_ipv6, 1);
        assert!(!report.summary.label_distribution.contains_key("skipped"));
        assert_eq!(report.summary.label_distribution.get("edge"), Some(&1));
    }

    #[test]
    fn validation_is_idempotent() {
        let map = route_map(
            1,
            vec![
                segment(&["10.0.0.0/8", "bogus"], &["x", "X"]),
                segment(&["2001:db8::/96"], &["y"]),
            ],
        );
        let validator = Validator::default();
        let first = validator.validate(&map);
        let second = validator.validate(&map);
        assert_eq!(first, second);
        assert_eq!(first.errors.len(), 3);
    }

    #[test]
    fn configured_policy_is_applied() {
        let validator = Validator::new(ValidatorConfig {
            policy: NetmaskPolicy {
                max_ipv4_bits: 8,
                max_ipv6_bits: 64,
            },
            ..ValidatorConfig::default()
        });
        let report = validator.validate(&route_map(1, vec![segment(&["10.0.0.0/16"], &["a"])]));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors.errors()[0].to_string(),
            "network bits 16 > 8 (max) (for CIDR \"10.0.0.0/16\" at index=0, map segment index=0)"
        );
    }

    #[test]
    fn into_result_splits_on_errors() {
        let ok = validate(&route_map(1, vec![segment(&["10.0.0.0/8"], &["a"])]));
        let summary = ok.into_result().expect("clean map is accepted");
        assert_eq!(summary.num_networks, 1);

        let bad = validate(&route_map(3, Vec::new()));
        assert!(bad.into_result().is_err());
    }

    #[test]
    fn progress_fires_once_per_crossing() {
        let mut progress = Progress::new(10);
        assert!(!progress.crossed(9));
        assert!(progress.crossed(10));
        assert!(!progress.crossed(15));
        assert!(progress.crossed(35));
        assert!(!progress.crossed(39));

        let mut disabled = Progress::new(0);
        assert!(!disabled.crossed(1_000_000));
    }
}
