use std::collections::HashSet;

use super::classify::normalize_key;
use super::config::{GradeBand, MarksheetConfig};

/// Validate a marksheet configuration.
/// Returns all validation errors at once (not just the first).
///
/// The engine itself never fails on configuration; this is for hosts that
/// want to reject a bad config up front.
pub fn validate_marksheet(config: &MarksheetConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, subject) in config.subjects.iter().enumerate() {
        if subject.name.trim().is_empty() {
            errors.push(format!("subjects[{}].name: must not be blank", i));
        }
        if subject.out_of.is_nan() || subject.out_of <= 0.0 {
            errors.push(format!(
                "subjects[{}].out_of: must be positive, got {}",
                i, subject.out_of
            ));
        }
    }

    let mut group_names = HashSet::new();
    for (i, group) in config.combined.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(format!("combined[{}].name: must not be blank", i));
        } else if !group_names.insert(normalize_key(&group.name)) {
            errors.push(format!("combined[{}].name: duplicate group '{}'", i, group.name));
        }
        if group.components.is_empty() {
            errors.push(format!("combined[{}].components: must list at least one subject", i));
        }
    }

    validate_bands("grading.bands", &config.grading.bands, &mut errors);
    validate_bands("grading.strict_bands", &config.grading.strict_bands, &mut errors);

    if !config.grading.strict_subjects.is_empty() && config.grading.strict_bands.is_empty() {
        errors.push("grading.strict_subjects: listed without any strict_bands".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_bands(path: &str, bands: &[GradeBand], errors: &mut Vec<String>) {
    for (i, band) in bands.iter().enumerate() {
        if band.grade.trim().is_empty() {
            errors.push(format!("{}[{}].grade: must not be blank", path, i));
        }
        if band.lower > band.upper {
            errors.push(format!(
                "{}[{}]: lower bound {} is above upper bound {}",
                path, i, band.lower, band.upper
            ));
        }
        if band.points < 0.0 {
            errors.push(format!("{}[{}].points: must be non-negative", path, i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marksheet::config::{default_bands, CombinedGroup, GradingConfig, SubjectSpec};

    fn group(name: &str, components: &[&str]) -> CombinedGroup {
        CombinedGroup {
            name: name.to_string(),
            components: components.iter().map(|s| s.to_string()).collect(),
            header: None,
            hide_components: true,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = MarksheetConfig {
            subjects: vec![SubjectSpec { name: "Chem".to_string(), out_of: 50.0 }],
            combined: vec![group("Sciences", &["Bio", "Chem"])],
            grading: GradingConfig {
                enabled: true,
                bands: default_bands(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_marksheet(&config).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_marksheet(&MarksheetConfig::default()).is_ok());
    }

    #[test]
    fn test_non_positive_out_of() {
        let config = MarksheetConfig {
            subjects: vec![SubjectSpec { name: "Chem".to_string(), out_of: 0.0 }],
            ..Default::default()
        };
        let errors = validate_marksheet(&config).unwrap_err();
        assert!(errors[0].contains("subjects[0].out_of"));
    }

    #[test]
    fn test_inverted_band() {
        let mut config = MarksheetConfig::default();
        config.grading.bands = vec![GradeBand::new("A", 100.0, 80.0, 12.0)];
        let errors = validate_marksheet(&config).unwrap_err();
        assert!(errors[0].contains("grading.bands[0]"));
    }

    #[test]
    fn test_duplicate_and_empty_groups() {
        let config = MarksheetConfig {
            combined: vec![group("Sciences", &["Bio"]), group("sciences", &[])],
            ..Default::default()
        };
        let errors = validate_marksheet(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("duplicate"));
        assert!(errors[1].contains("combined[1].components"));
    }

    #[test]
    fn test_strict_subjects_without_bands() {
        let mut config = MarksheetConfig::default();
        config.grading.strict_subjects = vec!["Maths".to_string()];
        let errors = validate_marksheet(&config).unwrap_err();
        assert!(errors[0].contains("strict_subjects"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = MarksheetConfig {
            subjects: vec![SubjectSpec { name: "Chem".to_string(), out_of: -5.0 }], // Error 1
            ..Default::default()
        };
        config.grading.strict_bands = vec![GradeBand::new("", 0.0, 100.0, -1.0)]; // Errors 2, 3
        let errors = validate_marksheet(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
