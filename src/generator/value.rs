//! SQL value rendering with mandatory string sanitization.
//!
//! Every string value passes through the dialect's escape routine before it
//! is interpolated into statement text; an unescaped quote would corrupt the
//! statement stream for both the loader and any other consumer of the script.

use serde::{Deserialize, Serialize};

/// Target dialect for the generated script.
///
/// Defaults to the dialect the bundled loader executes, so a generated
/// script loads without escaping mismatches out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
    #[default]
    DuckDb,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "duckdb" => Ok(Dialect::DuckDb),
            _ => Err(format!(
                "Unknown dialect: {}. Valid: mysql, postgres, sqlite, duckdb",
                s
            )),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// A single generated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl SqlValue {
    /// Render the value as SQL literal text for the given dialect.
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Float(n) => format!("{:.2}", n),
            SqlValue::Str(s) => format!("'{}'", escape_string(s, dialect)),
        }
    }
}

/// Escape a string for safe interpolation into a quoted SQL literal.
pub fn escape_string(s: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::MySql => s
            .replace('\\', "\\\\")
            .replace('\'', "\\'")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
        Dialect::Postgres | Dialect::Sqlite | Dialect::DuckDb => s.replace('\'', "''"),
    }
}

/// Render one value tuple: `(v1, v2, ...)`.
pub fn render_tuple(values: &[SqlValue], dialect: Dialect) -> String {
    let rendered: Vec<String> = values.iter().map(|v| v.render(dialect)).collect();
    format!("({})", rendered.join(", "))
}
