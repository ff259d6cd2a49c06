use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

pub const SMALL_BUFFER_SIZE: usize = 64 * 1024;
pub const MEDIUM_BUFFER_SIZE: usize = 256 * 1024;

/// How many leading bytes of a script are scanned for the database directive.
pub const HEAD_SCAN_LIMIT: usize = 512 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Unknown,
    CreateDatabase,
    Use,
    Set,
    Begin,
    Commit,
    CreateTable,
    Insert,
}

impl StatementKind {
    /// Directives the loader handles itself instead of executing.
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            StatementKind::CreateDatabase | StatementKind::Use | StatementKind::Set
        )
    }
}

static DATABASE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)CREATE\s+DATABASE\s+(?:IF\s+NOT\s+EXISTS\s+)?`?(\w+)`?|USE\s+`?(\w+)`?")
        .expect("valid regex")
});

/// Extract the target database name from the leading portion of a script.
///
/// Matches either a `CREATE DATABASE IF NOT EXISTS <name>` or a `USE <name>`
/// directive, whichever appears first.
pub fn extract_database_name(head: &str) -> Option<String> {
    DATABASE_NAME_RE.captures(head).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

/// Streaming SQL statement reader.
///
/// Splits input on the `;` terminator while respecting single- and
/// double-quoted strings (including backslash escapes), so a `;` inside a
/// generated text value never ends a statement. Concatenating the returned
/// statements reproduces the input byte for byte.
pub struct StatementReader<R: Read> {
    reader: BufReader<R>,
    stmt_buffer: Vec<u8>,
}

impl<R: Read> StatementReader<R> {
    pub fn new(reader: R, buffer_size: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(buffer_size, reader),
            stmt_buffer: Vec::with_capacity(32 * 1024),
        }
    }

    pub fn read_statement(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        self.stmt_buffer.clear();

        let mut inside_single_quote = false;
        let mut inside_double_quote = false;
        let mut escaped = false;

        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                if self.stmt_buffer.is_empty() {
                    return Ok(None);
                }
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            let mut consumed = 0;
            let mut found_terminator = false;

            for (i, &b) in buf.iter().enumerate() {
                let inside_string = inside_single_quote || inside_double_quote;

                if escaped {
                    escaped = false;
                    continue;
                }

                if b == b'\\' && inside_string {
                    escaped = true;
                    continue;
                }

                if b == b'\'' && !inside_double_quote {
                    inside_single_quote = !inside_single_quote;
                } else if b == b'"' && !inside_single_quote {
                    inside_double_quote = !inside_double_quote;
                } else if b == b';' && !inside_string {
                    self.stmt_buffer.extend_from_slice(&buf[..=i]);
                    consumed = i + 1;
                    found_terminator = true;
                    break;
                }
            }

            if found_terminator {
                self.reader.consume(consumed);
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            self.stmt_buffer.extend_from_slice(buf);
            let len = buf.len();
            self.reader.consume(len);
        }
    }
}

/// Classify a statement and extract the table name where one applies.
pub fn classify_statement(stmt: &[u8]) -> (StatementKind, String) {
    let stmt = trim_ascii_start(stmt);

    if stmt.len() < 3 {
        return (StatementKind::Unknown, String::new());
    }

    let upper_prefix: Vec<u8> = stmt
        .iter()
        .take(32)
        .map(|b| b.to_ascii_uppercase())
        .collect();

    if upper_prefix.starts_with(b"CREATE DATABASE") {
        return (StatementKind::CreateDatabase, String::new());
    }

    if upper_prefix.starts_with(b"USE ") || upper_prefix.starts_with(b"USE\t") {
        return (StatementKind::Use, String::new());
    }

    if upper_prefix.starts_with(b"SET ") {
        return (StatementKind::Set, String::new());
    }

    if upper_prefix.starts_with(b"START TRANSACTION") || upper_prefix.starts_with(b"BEGIN") {
        return (StatementKind::Begin, String::new());
    }

    if upper_prefix.starts_with(b"COMMIT") {
        return (StatementKind::Commit, String::new());
    }

    if upper_prefix.starts_with(b"CREATE TABLE") {
        if let Some(name) = extract_table_name(stmt, 12) {
            return (StatementKind::CreateTable, name);
        }
    }

    if upper_prefix.starts_with(b"INSERT INTO") {
        if let Some(name) = extract_table_name(stmt, 11) {
            return (StatementKind::Insert, name);
        }
    }

    (StatementKind::Unknown, String::new())
}

#[inline]
fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .unwrap_or(data.len());
    &data[start..]
}

#[inline]
fn extract_table_name(stmt: &[u8], offset: usize) -> Option<String> {
    let mut i = offset;

    while i < stmt.len() && is_whitespace(stmt[i]) {
        i += 1;
    }

    if i >= stmt.len() {
        return None;
    }

    let quote_char = if stmt[i] == b'`' || stmt[i] == b'"' {
        let q = stmt[i];
        i += 1;
        Some(q)
    } else {
        None
    };

    let start = i;

    while i < stmt.len() {
        let b = stmt[i];
        if let Some(q) = quote_char {
            if b == q {
                return Some(String::from_utf8_lossy(&stmt[start..i]).into_owned());
            }
        } else if is_whitespace(b) || b == b'(' || b == b';' || b == b',' {
            if i > start {
                return Some(String::from_utf8_lossy(&stmt[start..i]).into_owned());
            }
            return None;
        }
        i += 1;
    }

    if quote_char.is_none() && i > start {
        return Some(String::from_utf8_lossy(&stmt[start..i]).into_owned());
    }

    None
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

pub fn determine_buffer_size(file_size: u64) -> usize {
    if file_size > 1024 * 1024 * 1024 {
        MEDIUM_BUFFER_SIZE
    } else {
        SMALL_BUFFER_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_database_name_create() {
        let head = "CREATE DATABASE IF NOT EXISTS company_db;\nUSE company_db;\n";
        assert_eq!(extract_database_name(head), Some("company_db".to_string()));
    }

    #[test]
    fn test_extract_database_name_use_only() {
        let head = "-- dump\nUSE `payroll_db`;\n";
        assert_eq!(extract_database_name(head), Some("payroll_db".to_string()));
    }

    #[test]
    fn test_extract_database_name_missing() {
        let head = "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\n";
        assert_eq!(extract_database_name(head), None);
    }

    #[test]
    fn test_classify_create_table() {
        let (kind, name) = classify_statement(b"CREATE TABLE employees (empID INT);");
        assert_eq!(kind, StatementKind::CreateTable);
        assert_eq!(name, "employees");
    }

    #[test]
    fn test_classify_create_table_backticks() {
        let (kind, name) = classify_statement(b"CREATE TABLE `employee_project` (empID INT);");
        assert_eq!(kind, StatementKind::CreateTable);
        assert_eq!(name, "employee_project");
    }

    #[test]
    fn test_classify_insert() {
        let (kind, name) = classify_statement(b"INSERT INTO payroll VALUES (1, 'May 2023');");
        assert_eq!(kind, StatementKind::Insert);
        assert_eq!(name, "payroll");
    }

    #[test]
    fn test_classify_directives() {
        let (kind, _) = classify_statement(b"CREATE DATABASE IF NOT EXISTS company_db;");
        assert_eq!(kind, StatementKind::CreateDatabase);

        let (kind, _) = classify_statement(b"USE company_db;");
        assert_eq!(kind, StatementKind::Use);

        let (kind, _) = classify_statement(b"SET FOREIGN_KEY_CHECKS=0;");
        assert_eq!(kind, StatementKind::Set);
    }

    #[test]
    fn test_classify_transaction_markers() {
        let (kind, _) = classify_statement(b"START TRANSACTION;");
        assert_eq!(kind, StatementKind::Begin);

        let (kind, _) = classify_statement(b"COMMIT;");
        assert_eq!(kind, StatementKind::Commit);
    }

    #[test]
    fn test_read_statement_basic() {
        let sql = b"CREATE TABLE t1 (id INT);\nINSERT INTO t1 VALUES (1);";
        let mut reader = StatementReader::new(&sql[..], 1024);

        let stmt1 = reader.read_statement().unwrap().unwrap();
        assert_eq!(stmt1, b"CREATE TABLE t1 (id INT);");

        let stmt2 = reader.read_statement().unwrap().unwrap();
        assert_eq!(stmt2, b"\nINSERT INTO t1 VALUES (1);");

        assert!(reader.read_statement().unwrap().is_none());
    }

    #[test]
    fn test_read_statement_semicolon_in_string() {
        let sql = b"INSERT INTO t1 VALUES ('hello; world');";
        let mut reader = StatementReader::new(&sql[..], 1024);

        let stmt = reader.read_statement().unwrap().unwrap();
        assert_eq!(stmt, b"INSERT INTO t1 VALUES ('hello; world');");
    }

    #[test]
    fn test_read_statement_escaped_quote() {
        let sql = b"INSERT INTO t1 VALUES ('it\\'s a test');";
        let mut reader = StatementReader::new(&sql[..], 1024);

        let stmt = reader.read_statement().unwrap().unwrap();
        assert_eq!(stmt, b"INSERT INTO t1 VALUES ('it\\'s a test');");
    }

    #[test]
    fn test_split_rejoin_round_trip() {
        let sql = b"CREATE TABLE a (id INT);\nSTART TRANSACTION;\nINSERT INTO a VALUES (1, 'x;y'),\n(2, 'z');\nCOMMIT;\n";
        let mut reader = StatementReader::new(&sql[..], 64);

        let mut rejoined = Vec::new();
        while let Some(stmt) = reader.read_statement().unwrap() {
            rejoined.extend_from_slice(&stmt);
        }

        assert_eq!(rejoined, sql.to_vec());
    }
}
