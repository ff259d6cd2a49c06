//! Batched SQL script generation for the synthetic company dataset.
//!
//! The generator streams a complete script to any `Write` sink: a database
//! header, then for every table in dependency order a CREATE TABLE statement
//! followed by transaction-wrapped, batched multi-row INSERTs. Foreign keys
//! are correct by construction: referencing tables only draw ids from the
//! ranges already emitted for their targets.

pub mod batch;
pub mod config;
pub mod fake;
pub mod schema;
pub mod value;

pub use batch::InsertBatcher;
pub use config::{Enumerations, GeneratorConfig, DEFAULT_BATCH_SIZE};
pub use fake::FieldSource;
pub use schema::{TableDef, TABLE_ORDER};
pub use value::{render_tuple, Dialect, SqlValue};

use anyhow::Result;
use chrono::{Days, Months, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::io::{self, Write};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Per-table emission counters.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    pub table: String,
    pub rows: u64,
    pub insert_statements: u64,
}

/// Result of one generation run.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerateStats {
    pub tables: Vec<TableStats>,
    pub bytes_written: u64,
}

impl GenerateStats {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub struct ScriptGenerator {
    config: GeneratorConfig,
    fields: FieldSource<ChaCha8Rng>,
    attendance_span: (NaiveDate, NaiveDate),
    /// Reference "today": all relative date ranges anchor here so a seeded
    /// run reproduces the same script regardless of the wall clock.
    anchor: NaiveDate,
    on_table: Option<Box<dyn Fn(&str)>>,
}

impl ScriptGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let attendance_span = config.attendance_range()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            fields: FieldSource::new(rng),
            attendance_span,
            anchor: attendance_span.1,
            on_table: None,
        })
    }

    /// Callback invoked before each table is generated.
    pub fn with_table_progress<F: Fn(&str) + 'static>(mut self, f: F) -> Self {
        self.on_table = Some(Box::new(f));
        self
    }

    /// Stream the full script to `sink`. Any sink write error is fatal.
    pub fn generate<W: Write>(&mut self, sink: W) -> Result<GenerateStats> {
        let mut sink = CountingWriter {
            inner: sink,
            bytes: 0,
        };
        let mut stats = GenerateStats::default();

        self.write_header(&mut sink)?;

        for table in &TABLE_ORDER {
            if let Some(ref cb) = self.on_table {
                cb(table.name);
            }

            let ddl = schema::create_table_sql(table, self.config.dialect, &self.config.enums);
            sink.write_all(ddl.as_bytes())?;
            sink.write_all(b"START TRANSACTION;\n")?;

            let mut batcher =
                InsertBatcher::new(table.name, table.columns, self.config.batch_size);
            self.fill_table(table, &mut sink, &mut batcher)?;
            batcher.finish(&mut sink)?;

            sink.write_all(b"COMMIT;\n\n")?;

            stats.tables.push(TableStats {
                table: table.name.to_string(),
                rows: batcher.rows_written(),
                insert_statements: batcher.statements_written(),
            });
        }

        if self.config.dialect == Dialect::MySql {
            sink.write_all(b"SET FOREIGN_KEY_CHECKS=1;\nSET UNIQUE_CHECKS=1;\n")?;
        }
        sink.flush()?;

        stats.bytes_written = sink.bytes;
        Ok(stats)
    }

    fn write_header<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        write!(
            sink,
            "CREATE DATABASE IF NOT EXISTS {db};\nUSE {db};\n\n",
            db = self.config.database
        )?;
        if self.config.dialect == Dialect::MySql {
            sink.write_all(b"SET FOREIGN_KEY_CHECKS=0;\nSET UNIQUE_CHECKS=0;\n\n")?;
        }
        Ok(())
    }

    fn fill_table<W: Write>(
        &mut self,
        table: &TableDef,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        match table.name {
            "departments" => self.fill_departments(sink, batcher),
            "employees" => self.fill_employees(sink, batcher),
            "projects" => self.fill_projects(sink, batcher),
            "employee_project" => self.fill_employee_project(sink, batcher),
            "attendance" => self.fill_attendance(sink, batcher),
            "bonuses" => self.fill_bonuses(sink, batcher),
            "payroll" => self.fill_payroll(sink, batcher),
            "leaves" => self.fill_leaves(sink, batcher),
            "training" => self.fill_training(sink, batcher),
            "assets" => self.fill_assets(sink, batcher),
            "employee_benefits" => self.fill_benefits(sink, batcher),
            other => unreachable!("unknown table: {}", other),
        }
    }

    fn push<W: Write>(
        &self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
        values: &[SqlValue],
    ) -> io::Result<()> {
        batcher.push(sink, render_tuple(values, self.config.dialect))
    }

    fn years_back(&self, years: u32) -> NaiveDate {
        self.anchor
            .checked_sub_months(Months::new(years * 12))
            .unwrap_or(self.anchor)
    }

    fn months_back(&self, months: u32) -> NaiveDate {
        self.anchor
            .checked_sub_months(Months::new(months))
            .unwrap_or(self.anchor)
    }

    fn date_str(d: NaiveDate) -> SqlValue {
        SqlValue::Str(d.format("%Y-%m-%d").to_string())
    }

    fn fill_departments<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let departments = self.config.enums.departments.clone();
        for (i, dept) in departments.iter().enumerate() {
            self.push(
                sink,
                batcher,
                &[SqlValue::Int(i as i64 + 1), SqlValue::Str(dept.clone())],
            )?;
        }
        Ok(())
    }

    fn fill_employees<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let dept_count = self.config.enums.departments.len() as i64;
        let joined_from = self.years_back(10);

        for emp_id in 1..=self.config.employees as i64 {
            let age = self.fields.int_range(25, 60);
            let dob = self.fields.date_of_birth(age, self.anchor);
            let doj = self.fields.date_between(joined_from, self.anchor);
            let row = [
                SqlValue::Int(emp_id),
                SqlValue::Str(self.fields.person_name()),
                SqlValue::Int(age),
                SqlValue::Str(self.fields.pick(&self.config.enums.genders).to_string()),
                Self::date_str(dob),
                Self::date_str(doj),
                SqlValue::Str(self.fields.pick(&self.config.enums.roles).to_string()),
                SqlValue::Int(self.fields.int_range(70_000, 290_000)),
                SqlValue::Int(self.fields.int_range(1, dept_count)),
                SqlValue::Str(self.fields.address()),
                SqlValue::Str(self.fields.phone_digits()),
                SqlValue::Str(self.fields.email()),
                SqlValue::Str(
                    self.fields
                        .pick(&self.config.enums.marital_statuses)
                        .to_string(),
                ),
            ];
            self.push(sink, batcher, &row)?;
        }
        Ok(())
    }

    fn fill_projects<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let dept_count = self.config.enums.departments.len() as i64;
        let started_from = self.years_back(3);
        let started_until = self.months_back(6);

        for project_id in 1..=self.config.projects as i64 {
            let start = self.fields.date_between(started_from, started_until);
            let end = self.fields.date_between(start, self.anchor);
            let row = [
                SqlValue::Int(project_id),
                SqlValue::Str(self.fields.project_name()),
                Self::date_str(start),
                Self::date_str(end),
                SqlValue::Str(
                    self.fields
                        .pick(&self.config.enums.project_statuses)
                        .to_string(),
                ),
                SqlValue::Int(self.fields.int_range(500_000, 4_000_000)),
                SqlValue::Int(self.fields.int_range(1, dept_count)),
            ];
            self.push(sink, batcher, &row)?;
        }
        Ok(())
    }

    /// Association table: each employee gets a random-sized subset of
    /// projects, sampled without replacement so no (empID, project_id)
    /// pair repeats.
    fn fill_employee_project<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let project_count = self.config.projects as i64;
        if project_count == 0 {
            return Ok(());
        }
        let max_assignments = self
            .config
            .projects_per_employee
            .min(self.config.projects) as i64;
        let assigned_from = self.years_back(2);

        for emp_id in 1..=self.config.employees as i64 {
            let count = self.fields.int_range(1, max_assignments);
            let mut assigned: ahash::AHashSet<i64> = ahash::AHashSet::with_capacity(count as usize);
            while (assigned.len() as i64) < count {
                assigned.insert(self.fields.int_range(1, project_count));
            }

            // Set iteration order varies between runs; emit in id order so a
            // seeded run always produces the same script.
            let mut assigned: Vec<i64> = assigned.into_iter().collect();
            assigned.sort_unstable();

            for project_id in assigned {
                let row = [
                    SqlValue::Int(emp_id),
                    SqlValue::Int(project_id),
                    SqlValue::Str(self.fields.pick(&self.config.enums.roles).to_string()),
                    Self::date_str(self.fields.date_between(assigned_from, self.anchor)),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }

    fn fill_attendance<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let (from, to) = self.attendance_span;
        let statuses = self.config.enums.attendance_statuses.clone();
        let weights = self.config.enums.attendance_weights.clone();

        let mut attendance_id: i64 = 0;
        let mut day = from;
        while day <= to {
            for emp_id in 1..=self.config.employees as i64 {
                attendance_id += 1;
                let status = self.fields.pick_weighted(&statuses, &weights).to_string();
                let row = [
                    SqlValue::Int(attendance_id),
                    SqlValue::Int(emp_id),
                    Self::date_str(day),
                    SqlValue::Str(status),
                ];
                self.push(sink, batcher, &row)?;
            }
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(())
    }

    fn fill_bonuses<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let from = self.years_back(1);
        let mut bonus_id: i64 = 0;

        for emp_id in 1..=self.config.employees as i64 {
            for _ in 0..self.fields.int_range(0, 3) {
                bonus_id += 1;
                let hours = self.fields.int_range(1, 10);
                let row = [
                    SqlValue::Int(bonus_id),
                    SqlValue::Int(emp_id),
                    SqlValue::Int(hours),
                    SqlValue::Int(hours * 1000),
                    Self::date_str(self.fields.date_between(from, self.anchor)),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }

    fn fill_payroll<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let from = self.years_back(1);
        let year = self.config.payroll_year;
        let mut payroll_id: i64 = 0;

        for emp_id in 1..=self.config.employees as i64 {
            let base_salary = self.fields.int_range(70_000, 290_000);
            for month in MONTH_NAMES {
                payroll_id += 1;
                let bonus_paid = self.fields.int_range(0, 5000);
                let deductions = self.fields.int_range(0, 3000);
                let row = [
                    SqlValue::Int(payroll_id),
                    SqlValue::Int(emp_id),
                    SqlValue::Str(format!("{} {}", month, year)),
                    SqlValue::Int(base_salary),
                    SqlValue::Int(bonus_paid),
                    SqlValue::Int(deductions),
                    SqlValue::Int(base_salary + bonus_paid - deductions),
                    Self::date_str(self.fields.date_between(from, self.anchor)),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }

    fn fill_leaves<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let from = self.years_back(2);
        let mut leave_id: i64 = 0;

        for emp_id in 1..=self.config.employees as i64 {
            for _ in 0..self.fields.int_range(0, 5) {
                leave_id += 1;
                let start = self.fields.date_between(from, self.anchor);
                let end = start
                    .checked_add_days(Days::new(self.fields.int_range(1, 15) as u64))
                    .unwrap_or(start);
                let row = [
                    SqlValue::Int(leave_id),
                    SqlValue::Int(emp_id),
                    SqlValue::Str(self.fields.pick(&self.config.enums.leave_types).to_string()),
                    Self::date_str(start),
                    Self::date_str(end),
                    SqlValue::Str(
                        self.fields
                            .pick(&self.config.enums.leave_statuses)
                            .to_string(),
                    ),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }

    fn fill_training<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let from = self.years_back(2);
        let until = self.months_back(6);
        let mut training_id: i64 = 0;

        for emp_id in 1..=self.config.employees as i64 {
            for _ in 0..self.fields.int_range(0, 2) {
                training_id += 1;
                let start = self.fields.date_between(from, until);
                let end = start
                    .checked_add_days(Days::new(self.fields.int_range(5, 30) as u64))
                    .unwrap_or(start);
                let row = [
                    SqlValue::Int(training_id),
                    SqlValue::Int(emp_id),
                    SqlValue::Str(
                        self.fields
                            .pick(&self.config.enums.training_courses)
                            .to_string(),
                    ),
                    Self::date_str(start),
                    Self::date_str(end),
                    SqlValue::Str(
                        self.fields
                            .pick(&self.config.enums.training_statuses)
                            .to_string(),
                    ),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }

    fn fill_assets<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let from = self.years_back(3);
        let mut asset_id: i64 = 0;

        for emp_id in 1..=self.config.employees as i64 {
            for _ in 0..self.fields.int_range(0, 3) {
                asset_id += 1;
                let asset_type = self.fields.pick(&self.config.enums.asset_types).to_string();
                let asset_name = format!("{} {}", asset_type, self.fields.word());
                let row = [
                    SqlValue::Int(asset_id),
                    SqlValue::Int(emp_id),
                    SqlValue::Str(asset_name),
                    SqlValue::Str(asset_type),
                    Self::date_str(self.fields.date_between(from, self.anchor)),
                    SqlValue::Str(
                        self.fields
                            .pick(&self.config.enums.asset_statuses)
                            .to_string(),
                    ),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }

    fn fill_benefits<W: Write>(
        &mut self,
        sink: &mut W,
        batcher: &mut InsertBatcher,
    ) -> io::Result<()> {
        let mut benefit_id: i64 = 0;

        for emp_id in 1..=self.config.employees as i64 {
            for _ in 0..self.fields.int_range(0, 3) {
                benefit_id += 1;
                let name = self.fields.pick(&self.config.enums.benefits).to_string();
                let value = if name.contains("Stock") {
                    format!("{} units", self.fields.int_range(1, 100))
                } else {
                    format!("${}", self.fields.int_range(100, 2000))
                };
                let row = [
                    SqlValue::Int(benefit_id),
                    SqlValue::Int(emp_id),
                    SqlValue::Str(name),
                    SqlValue::Str(value),
                ];
                self.push(sink, batcher, &row)?;
            }
        }
        Ok(())
    }
}
