//! Label list validation for a single map segment.

use crate::error::ValidationError;
use crate::multi_error::MultiError;
use crate::summary::RouteMapSummary;
use std::collections::HashSet;

/// Validate the labels of map segment `segment`.
///
/// Each label is checked for being blank, for non-ASCII content, and for a
/// case-insensitive repeat of an earlier label in the same segment. Every
/// label, valid or not, is counted in the summary histogram under its exact
/// spelling.
pub fn validate_labels(
    labels: &[String],
    segment: usize,
    summary: &mut RouteMapSummary,
) -> MultiError<ValidationError> {
    let mut all_errors = MultiError::new();

    if labels.is_empty() {
        all_errors.push(ValidationError::EmptyLabels { segment });
        return all_errors;
    }

    let mut seen = HashSet::with_capacity(labels.len());

    for (index, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            all_errors.push(ValidationError::BlankLabel { index, segment });
        }
        if !label.is_ascii() {
            all_errors.push(ValidationError::NonAsciiLabel { index, segment });
        }
        if !seen.insert(label.to_lowercase()) {
            all_errors.push(ValidationError::DuplicateLabel {
                label: label.clone(),
                index,
                segment,
            });
        }

        summary.summarize_label(label);
    }

    all_errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn label_fixtures() {
        let fixtures: [(&[&str], bool); 5] = [
            (&[""], false),
            (&["    "], false),
            (&["\n"], false),
            (&["\u{98}"], false),
            (&["bags", "time"], true),
        ];

        let mut summary = RouteMapSummary::new();
        for (items, valid) in fixtures {
            let errors = validate_labels(&labels(items), 1, &mut summary);
            assert_eq!(errors.is_empty(), valid, "{items:?}");
        }

        assert_eq!(summary.label_distribution.get("bags"), Some(&1));
        assert_eq!(summary.label_distribution.get("time"), Some(&1));
    }

    #[test]
    fn empty_list_is_one_error() {
        let mut summary = RouteMapSummary::new();
        let errors = validate_labels(&[], 4, &mut summary);
        assert_eq!(errors.into_vec(), vec![ValidationError::EmptyLabels { segment: 4 }]);
        assert!(summary.label_distribution.is_empty());
    }

    #[test]
    fn duplicates_are_case_insensitive_and_keep_original_spelling() {
        let mut summary = RouteMapSummary::new();
        let errors = validate_labels(&labels(&["a", "A", "b", "a"]), 0, &mut summary);

        assert_eq!(
            errors.into_vec(),
            vec![
                ValidationError::DuplicateLabel {
                    label: "A".into(),
                    index: 1,
                    segment: 0
                },
                ValidationError::DuplicateLabel {
                    label: "a".into(),
                    index: 3,
                    segment: 0
                },
            ]
        );
        assert_eq!(summary.label_distribution.get("a"), Some(&2));
        assert_eq!(summary.label_distribution.get("A"), Some(&1));
        assert_eq!(summary.label_distribution.get("b"), Some(&1));
    }

    #[test]
    fn uniqueness_is_segment_scoped() {
        let mut summary = RouteMapSummary::new();
        assert!(validate_labels(&labels(&["edge"]), 0, &mut summary).is_empty());
        assert!(validate_labels(&labels(&["Edge"]), 1, &mut summary).is_empty());
        assert_eq!(summary.unique_labels(), 2);
    }

    #[test]
    fn checks_are_independent() {
        let mut summary = RouteMapSummary::new();
        let errors = validate_labels(&labels(&["\u{3000}", "\u{3000}"]), 2, &mut summary);
        assert_eq!(
            errors.into_vec(),
            vec![
                ValidationError::BlankLabel {
                    index: 0,
                    segment: 2
                },
                ValidationError::NonAsciiLabel {
                    index: 0,
                    segment: 2
                },
                ValidationError::BlankLabel {
                    index: 1,
                    segment: 2
                },
                ValidationError::NonAsciiLabel {
                    index: 1,
                    segment: 2
                },
                ValidationError::DuplicateLabel {
                    label: "\u{3000}".into(),
                    index: 1,
                    segment: 2
                },
            ]
        );
        assert_eq!(summary.label_distribution.get("\u{3000}"), Some(&2));
    }

    #[test]
    fn error_messages_locate_the_label() {
        let mut summary = RouteMapSummary::new();
        let messages: Vec<String> = validate_labels(&labels(&["ok", " ", "Ok"]), 5, &mut summary)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "empty or whitespace-only label (at index=1, map segment index=5)",
                "duplicate label \"Ok\" (at index=2, map segment index=5)",
            ]
        );
    }
}
