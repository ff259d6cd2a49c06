//! Fixed table graph for the generated company dataset.
//!
//! Tables are listed in dependency order: every foreign-key target precedes
//! the tables that reference it, so a script replayed top to bottom never
//! references a missing row.

use crate::generator::config::Enumerations;
use crate::generator::value::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const DEPARTMENTS: TableDef = TableDef {
    name: "departments",
    columns: &["department_id", "department_name"],
};

pub const EMPLOYEES: TableDef = TableDef {
    name: "employees",
    columns: &[
        "empID",
        "employee_name",
        "age",
        "gender",
        "date_of_birth",
        "date_of_joining",
        "role",
        "salary",
        "department_id",
        "address",
        "contact_number",
        "email_id",
        "marital_status",
    ],
};

pub const PROJECTS: TableDef = TableDef {
    name: "projects",
    columns: &[
        "project_id",
        "project_name",
        "start_date",
        "end_date",
        "status",
        "budget",
        "department_id",
    ],
};

pub const EMPLOYEE_PROJECT: TableDef = TableDef {
    name: "employee_project",
    columns: &["empID", "project_id", "role_in_project", "assigned_date"],
};

pub const ATTENDANCE: TableDef = TableDef {
    name: "attendance",
    columns: &["attendance_id", "empID", "date", "status"],
};

pub const BONUSES: TableDef = TableDef {
    name: "bonuses",
    columns: &["bonus_id", "empID", "hours_overtime", "bonus_amount", "bonus_date"],
};

pub const PAYROLL: TableDef = TableDef {
    name: "payroll",
    columns: &[
        "payroll_id",
        "empID",
        "month",
        "base_salary",
        "bonus_paid",
        "deductions",
        "net_salary",
        "payment_date",
    ],
};

pub const LEAVES: TableDef = TableDef {
    name: "leaves",
    columns: &["leave_id", "empID", "leave_type", "start_date", "end_date", "status"],
};

pub const TRAINING: TableDef = TableDef {
    name: "training",
    columns: &["training_id", "empID", "training_name", "start_date", "end_date", "status"],
};

pub const ASSETS: TableDef = TableDef {
    name: "assets",
    columns: &["asset_id", "empID", "asset_name", "asset_type", "purchase_date", "status"],
};

pub const EMPLOYEE_BENEFITS: TableDef = TableDef {
    name: "employee_benefits",
    columns: &["benefit_id", "empID", "benefit_name", "benefit_value"],
};

/// All tables in dependency order.
pub const TABLE_ORDER: [TableDef; 11] = [
    DEPARTMENTS,
    EMPLOYEES,
    PROJECTS,
    EMPLOYEE_PROJECT,
    ATTENDANCE,
    BONUSES,
    PAYROLL,
    LEAVES,
    TRAINING,
    ASSETS,
    EMPLOYEE_BENEFITS,
];

/// MySQL keeps its native ENUM type; everywhere else a VARCHAR stands in.
fn enum_type(dialect: Dialect, variants: &[String]) -> String {
    match dialect {
        Dialect::MySql => {
            let quoted: Vec<String> = variants
                .iter()
                .map(|v| format!("'{}'", v.replace('\'', "''")))
                .collect();
            format!("ENUM({})", quoted.join(", "))
        }
        _ => "VARCHAR(20)".to_string(),
    }
}

/// Render the CREATE TABLE statement for one table.
///
/// Primary keys are plain integers: the generator assigns ids itself so that
/// foreign-key ranges are known by construction, which also keeps the DDL
/// portable across dialects.
pub fn create_table_sql(table: &TableDef, dialect: Dialect, enums: &Enumerations) -> String {
    match table.name {
        "departments" => "CREATE TABLE departments (\n  department_id INT PRIMARY KEY,\n  department_name VARCHAR(50) UNIQUE\n);\n"
            .to_string(),
        "employees" => format!(
            "CREATE TABLE employees (\n  empID INT PRIMARY KEY,\n  employee_name VARCHAR(100),\n  age INT,\n  gender {gender},\n  date_of_birth DATE,\n  date_of_joining DATE,\n  role VARCHAR(50),\n  salary INT,\n  department_id INT,\n  address VARCHAR(200),\n  contact_number VARCHAR(12),\n  email_id VARCHAR(100),\n  marital_status {marital},\n  FOREIGN KEY (department_id) REFERENCES departments(department_id)\n);\n",
            gender = enum_type(dialect, &enums.genders),
            marital = enum_type(dialect, &enums.marital_statuses),
        ),
        "projects" => format!(
            "CREATE TABLE projects (\n  project_id INT PRIMARY KEY,\n  project_name VARCHAR(100),\n  start_date DATE,\n  end_date DATE,\n  status {status},\n  budget INT,\n  department_id INT,\n  FOREIGN KEY (department_id) REFERENCES departments(department_id)\n);\n",
            status = enum_type(dialect, &enums.project_statuses),
        ),
        "employee_project" => "CREATE TABLE employee_project (\n  empID INT,\n  project_id INT,\n  role_in_project VARCHAR(100),\n  assigned_date DATE,\n  PRIMARY KEY (empID, project_id),\n  FOREIGN KEY (empID) REFERENCES employees(empID),\n  FOREIGN KEY (project_id) REFERENCES projects(project_id)\n);\n"
            .to_string(),
        "attendance" => format!(
            "CREATE TABLE attendance (\n  attendance_id INT PRIMARY KEY,\n  empID INT,\n  date DATE,\n  status {status},\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n",
            status = enum_type(dialect, &enums.attendance_statuses),
        ),
        "bonuses" => "CREATE TABLE bonuses (\n  bonus_id INT PRIMARY KEY,\n  empID INT,\n  hours_overtime INT,\n  bonus_amount INT,\n  bonus_date DATE,\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n"
            .to_string(),
        "payroll" => "CREATE TABLE payroll (\n  payroll_id INT PRIMARY KEY,\n  empID INT,\n  month VARCHAR(20),\n  base_salary INT,\n  bonus_paid INT,\n  deductions INT,\n  net_salary INT,\n  payment_date DATE,\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n"
            .to_string(),
        "leaves" => format!(
            "CREATE TABLE leaves (\n  leave_id INT PRIMARY KEY,\n  empID INT,\n  leave_type {ltype},\n  start_date DATE,\n  end_date DATE,\n  status {status},\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n",
            ltype = enum_type(dialect, &enums.leave_types),
            status = enum_type(dialect, &enums.leave_statuses),
        ),
        "training" => format!(
            "CREATE TABLE training (\n  training_id INT PRIMARY KEY,\n  empID INT,\n  training_name VARCHAR(100),\n  start_date DATE,\n  end_date DATE,\n  status {status},\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n",
            status = enum_type(dialect, &enums.training_statuses),
        ),
        "assets" => format!(
            "CREATE TABLE assets (\n  asset_id INT PRIMARY KEY,\n  empID INT,\n  asset_name VARCHAR(100),\n  asset_type VARCHAR(50),\n  purchase_date DATE,\n  status {status},\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n",
            status = enum_type(dialect, &enums.asset_statuses),
        ),
        "employee_benefits" => "CREATE TABLE employee_benefits (\n  benefit_id INT PRIMARY KEY,\n  empID INT,\n  benefit_name VARCHAR(100),\n  benefit_value VARCHAR(100),\n  FOREIGN KEY (empID) REFERENCES employees(empID)\n);\n"
            .to_string(),
        other => unreachable!("unknown table: {}", other),
    }
}
