use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::classify::{normalize_key, IdentityPolicy};

/// Default maximum attainable raw score for a subject.
pub const DEFAULT_OUT_OF: f64 = 100.0;

/// Full engine configuration.
///
/// Every section is optional; absent keys fall back to the documented
/// defaults (grading disabled, no exclusions, rank by total, out of 100).
///
/// Example YAML:
/// ```yaml
/// subjects:
///   - { name: Chemistry, out_of: 50 }
/// combined:
///   - name: Sciences
///     components: [Biology, Chemistry]
/// grading:
///   enabled: true
///   bands:
///     - { grade: A, lower: 80, upper: 100, points: 12 }
///     - { grade: B, lower: 0, upper: 79, points: 6 }
/// exclusion:
///   subjects: [CRE]
///   drop_lowest: true
///   footer_students: [John]
/// ranking:
///   basis: points
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MarksheetConfig {
    /// Per-subject maxima. Subjects not listed are out of 100.
    pub subjects: Vec<SubjectSpec>,

    /// Virtual subjects built from two or more raw subjects.
    pub combined: Vec<CombinedGroup>,

    pub grading: GradingConfig,

    pub exclusion: ExclusionConfig,

    pub ranking: RankingConfig,

    /// Recognized identity column names (admission number, name, class, ...).
    pub identity: IdentityPolicy,
}

impl MarksheetConfig {
    /// Maximum for a subject, matched case/space-insensitively.
    pub fn out_of(&self, subject: &str) -> f64 {
        let key = normalize_key(subject);
        self.subjects
            .iter()
            .find(|s| normalize_key(&s.name) == key)
            .map(|s| s.out_of)
            .unwrap_or(DEFAULT_OUT_OF)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubjectSpec {
    pub name: String,

    /// Maximum attainable raw score ("out of").
    #[serde(default = "default_out_of")]
    pub out_of: f64,
}

fn default_out_of() -> f64 {
    DEFAULT_OUT_OF
}

/// A virtual subject whose percentage comes from summed component scores.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CombinedGroup {
    /// Name used by exclusion and strict-grading lists.
    pub name: String,

    /// Component subject columns, in order.
    pub components: Vec<String>,

    /// Display header. Defaults to `name`.
    #[serde(default)]
    pub header: Option<String>,

    /// Hidden components are neither displayed nor counted individually.
    #[serde(default = "default_true")]
    pub hide_components: bool,
}

impl CombinedGroup {
    pub fn display_header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.name)
    }
}

fn default_true() -> bool {
    true
}

/// Grade band. Bands are tried in list order; the first whose inclusive
/// `[lower, upper]` contains the rounded percentage wins.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradeBand {
    pub grade: String,
    pub lower: f64,
    pub upper: f64,
    #[serde(default)]
    pub points: f64,
}

impl GradeBand {
    pub fn new(grade: &str, lower: f64, upper: f64, points: f64) -> Self {
        Self {
            grade: grade.to_string(),
            lower,
            upper,
            points,
        }
    }

    pub fn contains(&self, rounded: f64) -> bool {
        self.lower <= rounded && rounded <= self.upper
    }
}

/// Bands used when grading is enabled but none are configured.
pub fn default_bands() -> Vec<GradeBand> {
    vec![
        GradeBand::new("A", 80.0, 100.0, 12.0),
        GradeBand::new("B", 70.0, 79.0, 10.0),
        GradeBand::new("C", 60.0, 69.0, 8.0),
        GradeBand::new("D", 50.0, 59.0, 6.0),
        GradeBand::new("E", 0.0, 49.0, 4.0),
    ]
}

/// How strict-subject names are compared against subject/group names.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    /// Byte-for-byte equality.
    Exact,
    /// Case, whitespace and punctuation insensitive.
    #[default]
    Normalized,
}

impl NameMatch {
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            NameMatch::Exact => a == b,
            NameMatch::Normalized => normalize_key(a) == normalize_key(b),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    pub enabled: bool,

    /// Default band list. Empty means [`default_bands`].
    pub bands: Vec<GradeBand>,

    /// Alternative bands for the subjects in `strict_subjects`.
    pub strict_bands: Vec<GradeBand>,

    /// Subject or combined-group names graded with `strict_bands`.
    pub strict_subjects: Vec<String>,

    pub strict_match: NameMatch,
}

impl GradingConfig {
    /// Band list in effect for `subject`.
    pub fn bands_for(&self, subject: &str) -> Cow<'_, [GradeBand]> {
        let strict = !self.strict_bands.is_empty()
            && self
                .strict_subjects
                .iter()
                .any(|s| self.strict_match.matches(s, subject));
        if strict {
            Cow::Borrowed(&self.strict_bands)
        } else if self.bands.is_empty() {
            Cow::Owned(default_bands())
        } else {
            Cow::Borrowed(&self.bands)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExclusionConfig {
    /// Subjects or combined groups never counted in Total/Points.
    pub subjects: Vec<String>,

    /// Drop each student's single lowest contributing subject.
    pub drop_lowest: bool,

    /// Students left out of the footer aggregates (still shown in the body).
    pub footer_students: Vec<String>,
}

impl ExclusionConfig {
    pub fn excludes_subject(&self, subject: &str) -> bool {
        let key = normalize_key(subject);
        self.subjects.iter().any(|s| normalize_key(s) == key)
    }

    pub fn excludes_from_footer(&self, student: &str) -> bool {
        let name = student.trim();
        !name.is_empty()
            && self
                .footer_students
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RankingBasis {
    #[default]
    Total,
    Points,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub basis: RankingBasis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarksheetConfig::default();
        assert!(!config.grading.enabled);
        assert!(config.exclusion.subjects.is_empty());
        assert!(!config.exclusion.drop_lowest);
        assert_eq!(config.ranking.basis, RankingBasis::Total);
        assert_eq!(config.out_of("Math"), 100.0);
    }

    #[test]
    fn test_empty_config_parse() {
        let config: MarksheetConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, MarksheetConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
subjects:
  - name: Chemistry
    out_of: 50
  - name: Biology
combined:
  - name: Sciences
    components: [Biology, Chemistry]
    header: "SCI"
grading:
  enabled: true
  bands:
    - { grade: A, lower: 80, upper: 100, points: 12 }
  strict_bands:
    - { grade: A, lower: 90, upper: 100, points: 12 }
  strict_subjects: [Sciences]
  strict_match: exact
exclusion:
  subjects: [CRE]
  drop_lowest: true
  footer_students: [John]
ranking:
  basis: points
"#;
        let config: MarksheetConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.out_of("chemistry"), 50.0);
        assert_eq!(config.out_of("Biology"), 100.0);
        assert_eq!(config.combined[0].display_header(), "SCI");
        assert!(config.combined[0].hide_components);
        assert!(config.grading.enabled);
        assert_eq!(config.grading.strict_match, NameMatch::Exact);
        assert!(config.exclusion.drop_lowest);
        assert_eq!(config.ranking.basis, RankingBasis::Points);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<MarksheetConfig, _> = serde_saphyr::from_str("colour: blue");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = MarksheetConfig::default();
        config.grading.enabled = true;
        config.grading.bands = default_bands();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: MarksheetConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_bands_for_uses_strict_list() {
        let grading = GradingConfig {
            enabled: true,
            bands: vec![GradeBand::new("A", 70.0, 100.0, 12.0)],
            strict_bands: vec![GradeBand::new("A", 90.0, 100.0, 12.0)],
            strict_subjects: vec!["Maths".to_string()],
            strict_match: NameMatch::Normalized,
        };
        assert_eq!(grading.bands_for(" maths ")[0].lower, 90.0);
        assert_eq!(grading.bands_for("English")[0].lower, 70.0);
    }

    #[test]
    fn test_bands_for_borrows_configured_lists() {
        let grading = GradingConfig {
            enabled: true,
            bands: vec![GradeBand::new("A", 70.0, 100.0, 12.0)],
            strict_bands: vec![GradeBand::new("A", 90.0, 100.0, 12.0)],
            strict_subjects: vec!["Maths".to_string()],
            strict_match: NameMatch::Normalized,
        };
        assert!(matches!(grading.bands_for("Maths"), Cow::Borrowed(_)));
        assert!(matches!(grading.bands_for("English"), Cow::Borrowed(_)));
        assert!(matches!(GradingConfig::default().bands_for("English"), Cow::Owned(_)));
    }

    #[test]
    fn test_bands_for_exact_match() {
        let grading = GradingConfig {
            enabled: true,
            bands: vec![],
            strict_bands: vec![GradeBand::new("A", 90.0, 100.0, 12.0)],
            strict_subjects: vec!["Maths".to_string()],
            strict_match: NameMatch::Exact,
        };
        assert_eq!(grading.bands_for("Maths")[0].lower, 90.0);
        // Falls back to the default band table
        assert_eq!(grading.bands_for("maths").to_vec(), default_bands());
    }

    #[test]
    fn test_footer_exclusion_case_insensitive() {
        let exclusion = ExclusionConfig {
            footer_students: vec!["John".to_string()],
            ..Default::default()
        };
        assert!(exclusion.excludes_from_footer(" john "));
        assert!(!exclusion.excludes_from_footer("Johnny"));
        assert!(!exclusion.excludes_from_footer(""));
    }
}
