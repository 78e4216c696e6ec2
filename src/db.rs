// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("ph.sahod", "Sahod", "sahod"));

pub const DB_ENV: &str = "SAHOD_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("sahod.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS employees(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_number TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        department TEXT NOT NULL,
        position TEXT NOT NULL,
        employment_type TEXT NOT NULL DEFAULT 'regular'
            CHECK(employment_type IN ('regular','probationary','contractual','part_time')),
        hire_date TEXT NOT NULL,
        basic_salary TEXT, -- NULL until HR sets it
        status TEXT NOT NULL DEFAULT 'active'
            CHECK(status IN ('active','inactive','resigned','terminated')),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_employees_status ON employees(status);

    CREATE TABLE IF NOT EXISTS payroll_periods(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL UNIQUE,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        pay_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'draft'
            CHECK(status IN ('draft','processing','completed','cancelled')),
        total_employees INTEGER NOT NULL DEFAULT 0,
        gross_pay TEXT NOT NULL DEFAULT '0',
        deductions TEXT NOT NULL DEFAULT '0',
        net_pay TEXT NOT NULL DEFAULT '0',
        overtime TEXT NOT NULL DEFAULT '0',
        holiday TEXT NOT NULL DEFAULT '0',
        allowances TEXT NOT NULL DEFAULT '0',
        processed_date TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        CHECK(start_date <= end_date)
    );

    -- one row per (period, employee); a run replaces the whole period
    CREATE TABLE IF NOT EXISTS payroll_records(
        period_id INTEGER NOT NULL,
        employee_id INTEGER NOT NULL,
        employee_name TEXT NOT NULL,
        department TEXT NOT NULL,
        position TEXT NOT NULL,
        basic_salary TEXT NOT NULL,
        overtime TEXT NOT NULL,
        holiday TEXT NOT NULL,
        allowances TEXT NOT NULL,
        gross_pay TEXT NOT NULL,
        sss TEXT NOT NULL,
        philhealth TEXT NOT NULL,
        pagibig TEXT NOT NULL,
        withholding_tax TEXT NOT NULL,
        total_deductions TEXT NOT NULL,
        net_pay TEXT NOT NULL,
        PRIMARY KEY(period_id, employee_id),
        FOREIGN KEY(period_id) REFERENCES payroll_periods(id) ON DELETE CASCADE,
        FOREIGN KEY(employee_id) REFERENCES employees(id)
    );

    CREATE TABLE IF NOT EXISTS earnings(
        period_id INTEGER NOT NULL,
        employee_id INTEGER NOT NULL,
        overtime TEXT NOT NULL DEFAULT '0',
        holiday TEXT NOT NULL DEFAULT '0',
        allowances TEXT NOT NULL DEFAULT '0',
        PRIMARY KEY(period_id, employee_id),
        FOREIGN KEY(period_id) REFERENCES payroll_periods(id) ON DELETE CASCADE,
        FOREIGN KEY(employee_id) REFERENCES employees(id)
    );
    "#,
    )?;
    Ok(())
}
