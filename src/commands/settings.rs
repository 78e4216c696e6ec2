// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{SETTING_KEYS, arg, earnings_policy, get_setting, pretty_table, set_setting};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set", sub)) => {
            let key = arg(sub, "key")?;
            let value = arg(sub, "value")?;
            set_setting(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let policy = earnings_policy(conn)?;
    let mut rows = vec![vec!["database".to_string(), db::db_path()?.display().to_string()]];
    for key in SETTING_KEYS {
        let effective = match *key {
            "overtime_rate" => policy.overtime_rate.to_string(),
            "holiday_rate" => policy.holiday_rate.to_string(),
            "allowance_rate" => policy.allowance_rate.to_string(),
            _ => get_setting(conn, key)?.unwrap_or_else(|| "(statutory default)".into()),
        };
        rows.push(vec![key.to_string(), effective]);
    }
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
