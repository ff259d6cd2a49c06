//! Bounded row-batch accumulation for multi-row INSERT statements.
//!
//! Rows are formatted as value tuples and collected until the batch bound is
//! reached, then flushed as a single `INSERT INTO t (cols) VALUES ...;`
//! statement. `finish` flushes the trailing partial batch so no rows are
//! ever dropped.

use std::io::{self, Write};

pub struct InsertBatcher {
    table: String,
    columns: String,
    batch_size: usize,
    tuples: Vec<String>,
    rows_written: u64,
    statements_written: u64,
}

impl InsertBatcher {
    pub fn new(table: &str, columns: &[&str], batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be at least 1");
        Self {
            table: table.to_string(),
            columns: columns.join(", "),
            batch_size,
            tuples: Vec::with_capacity(batch_size),
            rows_written: 0,
            statements_written: 0,
        }
    }

    /// Add one formatted value tuple; flushes when the bound is reached.
    pub fn push<W: Write>(&mut self, sink: &mut W, tuple: String) -> io::Result<()> {
        self.tuples.push(tuple);
        if self.tuples.len() >= self.batch_size {
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Flush any trailing partial batch.
    pub fn finish<W: Write>(&mut self, sink: &mut W) -> io::Result<()> {
        if !self.tuples.is_empty() {
            self.flush(sink)?;
        }
        Ok(())
    }

    fn flush<W: Write>(&mut self, sink: &mut W) -> io::Result<()> {
        write!(sink, "INSERT INTO {} ({}) VALUES\n", self.table, self.columns)?;
        sink.write_all(self.tuples.join(",\n").as_bytes())?;
        sink.write_all(b";\n")?;

        self.rows_written += self.tuples.len() as u64;
        self.statements_written += 1;
        self.tuples.clear();
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn statements_written(&self) -> u64 {
        self.statements_written
    }
}
