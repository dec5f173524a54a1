use reccheck_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Project-level config file name, looked up from the working directory upwards
pub const PROJECT_FILE: &str = "reccheck.toml";

/// Policy configuration for a checking run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub attendance: AttendanceConfig,

    pub subjects: SubjectsConfig,

    #[serde(default)]
    pub activities: ActivitiesConfig,

    #[serde(default)]
    pub terms: TermsConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub typography: TypographyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendanceConfig {
    #[serde(default = "default_scheduled_days")]
    pub required_scheduled_days: u32,

    #[serde(default = "default_long_absence_run")]
    pub long_absence_run_threshold: u32,

    #[serde(default = "default_short_absence_cumulative")]
    pub short_absence_cumulative_threshold: u32,

    #[serde(default = "default_tardy_cumulative")]
    pub tardy_cumulative_threshold: u32,

    #[serde(default = "default_marker")]
    pub perfect_attendance_marker: String,
}

/// Required subjects. Has no serde default: a policy file must list them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectsConfig {
    pub required_subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivitiesConfig {
    #[serde(default = "default_program_keywords")]
    pub required_program_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermsConfig {
    #[serde(default = "default_prohibited_terms")]
    pub prohibited_terms: Vec<String>,

    #[serde(default = "default_allow_listed")]
    pub allow_listed_institutions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedactionConfig {
    /// Known names to mask before parsing
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default = "default_placeholder")]
    pub name_placeholder: String,

    /// Mask 2-4 syllable names followed by 교사/학생/어린이
    #[serde(default = "default_true")]
    pub mask_titled_names: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypographyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attendance: AttendanceConfig::default(),
            subjects: SubjectsConfig::default(),
            activities: ActivitiesConfig::default(),
            terms: TermsConfig::default(),
            redaction: RedactionConfig::default(),
            typography: TypographyConfig::default(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            required_scheduled_days: default_scheduled_days(),
            long_absence_run_threshold: default_long_absence_run(),
            short_absence_cumulative_threshold: default_short_absence_cumulative(),
            tardy_cumulative_threshold: default_tardy_cumulative(),
            perfect_attendance_marker: default_marker(),
        }
    }
}

impl Default for SubjectsConfig {
    fn default() -> Self {
        Self {
            required_subjects: default_subjects(),
        }
    }
}

impl Default for ActivitiesConfig {
    fn default() -> Self {
        Self {
            required_program_keywords: default_program_keywords(),
        }
    }
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            prohibited_terms: default_prohibited_terms(),
            allow_listed_institutions: default_allow_listed(),
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            name_placeholder: default_placeholder(),
            mask_titled_names: true,
        }
    }
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_scheduled_days() -> u32 {
    190
}

fn default_long_absence_run() -> u32 {
    7
}

fn default_short_absence_cumulative() -> u32 {
    20
}

fn default_tardy_cumulative() -> u32 {
    7
}

fn default_marker() -> String {
    "개근".to_string()
}

fn default_true() -> bool {
    true
}

fn default_placeholder() -> String {
    "○○○".to_string()
}

fn default_subjects() -> Vec<String> {
    ["국어", "도덕", "사회", "수학", "과학", "체육", "음악", "미술", "영어"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_program_keywords() -> Vec<String> {
    vec![
        "학교폭력예방".to_string(),
        "안전교육".to_string(),
        "장애이해".to_string(),
    ]
}

fn default_prohibited_terms() -> Vec<String> {
    vec![
        "유튜브".to_string(),
        "카카오톡".to_string(),
        "네이버".to_string(),
        "구글".to_string(),
        "레고".to_string(),
        "삼성".to_string(),
        "학원".to_string(),
        "과학관".to_string(),
        "대학교".to_string(),
    ]
}

fn default_allow_listed() -> Vec<String> {
    vec![
        "교육청".to_string(),
        "교육부".to_string(),
        "교육지원청".to_string(),
        "국립과천과학관".to_string(),
        "국립중앙과학관".to_string(),
    ]
}

impl Config {
    /// Load config from the default per-user location, creating it if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save(&path)?;
            tracing::info!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }

    /// Resolve the config for a run: explicit path, then project file, then user config
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let current = std::env::current_dir()?;
        if let Some(path) = Self::find_project_file_from(&current) {
            tracing::debug!("Using project config {}", path.display());
            return Self::load_from(&path);
        }
        Self::load()
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Configuration(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get per-user config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "reccheck", "reccheck") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.reccheck/config.toml")
        }
    }

    /// Find reccheck.toml by walking up from given directory
    pub fn find_project_file_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_FILE);
            if candidate.exists() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Reject policies that would make the checks meaningless
    pub fn validate(&self) -> Result<()> {
        let a = &self.attendance;
        if a.required_scheduled_days == 0 {
            return Err(invalid("attendance.required_scheduled_days must be positive"));
        }
        for (name, value) in [
            ("long_absence_run_threshold", a.long_absence_run_threshold),
            (
                "short_absence_cumulative_threshold",
                a.short_absence_cumulative_threshold,
            ),
            ("tardy_cumulative_threshold", a.tardy_cumulative_threshold),
        ] {
            if value == 0 {
                return Err(invalid(&format!("attendance.{} must be positive", name)));
            }
        }
        if a.perfect_attendance_marker.trim().is_empty() {
            return Err(invalid("attendance.perfect_attendance_marker is empty"));
        }

        if self.subjects.required_subjects.is_empty() {
            return Err(invalid("subjects.required_subjects is empty"));
        }
        check_entries("subjects.required_subjects", &self.subjects.required_subjects)?;
        let mut seen = HashSet::new();
        for subject in &self.subjects.required_subjects {
            if !seen.insert(subject.as_str()) {
                return Err(invalid(&format!(
                    "subjects.required_subjects lists '{}' twice",
                    subject
                )));
            }
        }

        check_entries(
            "activities.required_program_keywords",
            &self.activities.required_program_keywords,
        )?;
        check_entries("terms.prohibited_terms", &self.terms.prohibited_terms)?;
        check_entries(
            "terms.allow_listed_institutions",
            &self.terms.allow_listed_institutions,
        )?;
        check_entries("redaction.names", &self.redaction.names)?;
        if let Some(name) = self
            .redaction
            .names
            .iter()
            .find(|n| n.chars().any(|c| c.is_ascii_digit()))
        {
            return Err(invalid(&format!(
                "redaction.names entry '{}' contains digits",
                name
            )));
        }

        let placeholder = &self.redaction.name_placeholder;
        if placeholder.trim().is_empty()
            || placeholder
                .chars()
                .any(|c| c.is_ascii_digit() || c == '-' || c == '*' || ('가'..='힣').contains(&c))
        {
            return Err(invalid(
                "redaction.name_placeholder must be non-empty with no digits, '-', '*' or Hangul",
            ));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::Configuration(message.to_string())
}

fn check_entries(field: &str, entries: &[String]) -> Result<()> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(invalid(&format!("{} contains an empty entry", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.attendance.required_scheduled_days, 190);
        assert_eq!(config.attendance.long_absence_run_threshold, 7);
        assert_eq!(config.attendance.short_absence_cumulative_threshold, 20);
        assert_eq!(config.attendance.tardy_cumulative_threshold, 7);
        assert_eq!(config.subjects.required_subjects.len(), 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(
            parsed.subjects.required_subjects,
            config.subjects.required_subjects
        );
        assert_eq!(
            parsed.attendance.perfect_attendance_marker,
            config.attendance.perfect_attendance_marker
        );
    }

    #[test]
    fn test_thresholds_default_inside_file() {
        let toml_str = r#"
[attendance]
required_scheduled_days = 191

[subjects]
required_subjects = ["국어", "수학"]
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.attendance.required_scheduled_days, 191);
        assert_eq!(config.attendance.tardy_cumulative_threshold, 7);
        assert_eq!(config.subjects.required_subjects, vec!["국어", "수학"]);
    }

    #[test]
    fn test_missing_subjects_is_configuration_error() {
        let toml_str = r#"
[attendance]
required_scheduled_days = 190
"#;
        let err = Config::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut config = Config::default();
        config.attendance.tardy_cumulative_threshold = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = Config::default();
        config.subjects.required_subjects.push("국어".to_string());
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = Config::default();
        config.redaction.name_placeholder = "X1".to_string();
        assert!(config.validate().is_err());
        config.redaction.name_placeholder = "이름".to_string();
        assert!(config.validate().is_err());
        config.redaction.name_placeholder = "-".to_string();
        assert!(config.validate().is_err());
        config.redaction.name_placeholder = "**".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_names_with_digits_rejected() {
        let mut config = Config::default();
        config.redaction.names = vec!["김철수".to_string(), "9".to_string()];
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_misspelled_key_rejected() {
        let toml_str = r#"
[attendance]
tardy_cumulative_treshold = 3

[subjects]
required_subjects = ["국어"]
"#;
        let err = Config::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let toml_str = r#"
typo_section = true

[subjects]
required_subjects = ["국어"]
"#;
        assert!(Config::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_find_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("grade3").join("class2");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default()
            .save(&dir.path().join(PROJECT_FILE))
            .unwrap();

        let found = Config::find_project_file_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_FILE));

        let loaded = Config::load_from(&found).unwrap();
        assert_eq!(loaded.subjects.required_subjects.len(), 9);
    }
}
