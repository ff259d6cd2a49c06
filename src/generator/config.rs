//! Generator configuration.
//!
//! Everything the generator consumes is carried in an explicit config struct
//! (no process-wide constants): row counts, batch size, seed, database name
//! and the categorical enumerations used for field values. A YAML file can
//! override any subset of the defaults.

use crate::generator::value::Dialect;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rows accumulated per multi-row INSERT before a flush.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the deterministic RNG.
    pub seed: u64,
    /// Maximum value tuples per INSERT statement.
    pub batch_size: usize,
    /// Database named in the script header directives.
    pub database: String,
    /// Target SQL dialect (controls DDL types and string escaping).
    pub dialect: Dialect,
    /// Number of employee rows.
    pub employees: usize,
    /// Number of project rows.
    pub projects: usize,
    /// Max projects assigned per employee (1..=max, without replacement).
    pub projects_per_employee: usize,
    /// First attendance day, `YYYY-MM-DD`.
    pub attendance_from: String,
    /// Last attendance day inclusive, `YYYY-MM-DD`.
    pub attendance_to: String,
    /// Year used for the twelve payroll month labels.
    pub payroll_year: i32,
    #[serde(flatten)]
    pub enums: Enumerations,
}

/// Fixed categorical value pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Enumerations {
    pub departments: Vec<String>,
    pub roles: Vec<String>,
    pub genders: Vec<String>,
    pub marital_statuses: Vec<String>,
    pub project_statuses: Vec<String>,
    pub attendance_statuses: Vec<String>,
    /// Relative weights for `attendance_statuses`, same length.
    pub attendance_weights: Vec<u32>,
    pub leave_types: Vec<String>,
    pub leave_statuses: Vec<String>,
    pub training_statuses: Vec<String>,
    pub training_courses: Vec<String>,
    pub asset_types: Vec<String>,
    pub asset_statuses: Vec<String>,
    pub benefits: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Enumerations {
    fn default() -> Self {
        Self {
            departments: strings(&[
                "IT",
                "HR",
                "Finance",
                "Marketing",
                "Sales",
                "Operations",
                "R&D",
                "Security",
            ]),
            roles: strings(&["Developer", "Manager", "Analyst", "Lead", "Executive"]),
            genders: strings(&["Male", "Female"]),
            marital_statuses: strings(&["Married", "Single", "Non-married"]),
            project_statuses: strings(&["Active", "Completed", "On Hold", "Cancelled"]),
            attendance_statuses: strings(&["Present", "Absent", "Half Day", "Leave"]),
            attendance_weights: vec![70, 10, 40, 40],
            leave_types: strings(&["Casual", "Sick", "Paid", "Unpaid"]),
            leave_statuses: strings(&["Approved", "Rejected", "Pending"]),
            training_statuses: strings(&["Completed", "Ongoing", "Not Started"]),
            training_courses: strings(&[
                "Python Basics",
                "Project Management",
                "Data Analysis",
                "Leadership",
                "Communication Skills",
            ]),
            asset_types: strings(&[
                "Laptop",
                "Mobile",
                "Access Card",
                "Monitor",
                "Keyboard",
                "Mouse",
                "Mac",
            ]),
            asset_statuses: strings(&["Issued", "Returned", "Lost"]),
            benefits: strings(&[
                "Health Insurance",
                "Stock Options",
                "Paid Vacation",
                "Gym Membership",
                "Transport Allowance",
            ]),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            batch_size: DEFAULT_BATCH_SIZE,
            database: "company_db".to_string(),
            dialect: Dialect::default(),
            employees: 1000,
            projects: 5000,
            projects_per_employee: 5,
            attendance_from: "2024-01-01".to_string(),
            attendance_to: "2024-12-31".to_string(),
            payroll_year: 2023,
            enums: Enumerations::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load overrides from a YAML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed attendance date range.
    pub fn attendance_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let from = NaiveDate::parse_from_str(&self.attendance_from, "%Y-%m-%d")
            .with_context(|| format!("Invalid attendance_from date: {}", self.attendance_from))?;
        let to = NaiveDate::parse_from_str(&self.attendance_to, "%Y-%m-%d")
            .with_context(|| format!("Invalid attendance_to date: {}", self.attendance_to))?;
        if from > to {
            bail!(
                "attendance_from ({}) is after attendance_to ({})",
                from,
                to
            );
        }
        Ok((from, to))
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.database.is_empty()
            || !self
                .database
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!(
                "Invalid database name: {:?} (use letters, digits and underscores)",
                self.database
            );
        }
        let pools: [(&str, &[String]); 13] = [
            ("departments", &self.enums.departments),
            ("roles", &self.enums.roles),
            ("genders", &self.enums.genders),
            ("marital_statuses", &self.enums.marital_statuses),
            ("project_statuses", &self.enums.project_statuses),
            ("attendance_statuses", &self.enums.attendance_statuses),
            ("leave_types", &self.enums.leave_types),
            ("leave_statuses", &self.enums.leave_statuses),
            ("training_statuses", &self.enums.training_statuses),
            ("training_courses", &self.enums.training_courses),
            ("asset_types", &self.enums.asset_types),
            ("asset_statuses", &self.enums.asset_statuses),
            ("benefits", &self.enums.benefits),
        ];
        for (name, pool) in pools {
            if pool.is_empty() {
                bail!("{} must not be empty", name);
            }
        }
        if self.projects_per_employee == 0 || self.projects_per_employee > self.projects.max(1) {
            bail!(
                "projects_per_employee ({}) must be between 1 and the project count ({})",
                self.projects_per_employee,
                self.projects
            );
        }
        if self.enums.attendance_statuses.len() != self.enums.attendance_weights.len() {
            bail!("attendance_statuses and attendance_weights must have the same length");
        }
        if self.enums.attendance_weights.iter().sum::<u32>() == 0 {
            bail!("attendance_weights must not sum to zero");
        }
        self.attendance_range()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.enums.departments.len(), 8);
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = "employees: 50\nbatch_size: 10\ndepartments: [Engineering, Support]\n";
        let config: GeneratorConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.employees, 50);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.enums.departments, vec!["Engineering", "Support"]);
        // Untouched fields keep their defaults
        assert_eq!(config.projects, 5000);
        assert_eq!(config.database, "company_db");
    }

    #[test]
    fn test_reject_zero_batch_size() {
        let config = GeneratorConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_bad_database_name() {
        let config = GeneratorConfig {
            database: "my db; DROP".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_empty_enumeration_pool() {
        let yaml = "roles: []\n";
        let config: GeneratorConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("roles"), "{}", err);

        let yaml = "genders: []\n";
        let config: GeneratorConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_total_attendance_weights() {
        let mut config = GeneratorConfig::default();
        config.enums.attendance_weights = vec![0; config.enums.attendance_statuses.len()];
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("attendance_weights"), "{}", err);
    }

    #[test]
    fn test_reject_inverted_attendance_range() {
        let config = GeneratorConfig {
            attendance_from: "2024-06-01".to_string(),
            attendance_to: "2024-01-01".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
