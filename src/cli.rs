// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn period_arg() -> Arg {
    required("period", "Payroll period id")
}

fn earnings_arg() -> Arg {
    Arg::new("earnings")
        .long("earnings")
        .value_parser(["policy", "recorded"])
        .default_value("policy")
        .help("Where overtime, holiday pay and allowances come from")
}

pub fn build_cli() -> Command {
    Command::new("sahod")
        .version(crate_version!())
        .about("Philippine payroll: statutory contributions, withholding tax, and period runs")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("employee")
                .about("Maintain the employee roster")
                .subcommand(
                    Command::new("add")
                        .about("Add an employee")
                        .arg(required("number", "Employee number"))
                        .arg(required("name", "Full name"))
                        .arg(required("department", "Department"))
                        .arg(required("position", "Position"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("regular")
                                .help("regular | probationary | contractual | part_time"),
                        )
                        .arg(required("hired", "Hire date YYYY-MM-DD"))
                        .arg(optional("salary", "Monthly basic salary")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List employees")
                        .arg(optional("status", "Only employees with this status"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("salary")
                        .about("Set an employee's monthly basic salary")
                        .arg(required("number", "Employee number"))
                        .arg(required("amount", "Monthly basic salary")),
                )
                .subcommand(
                    Command::new("status")
                        .about("Change an employee's status")
                        .arg(required("number", "Employee number"))
                        .arg(required(
                            "status",
                            "active | inactive | resigned | terminated",
                        )),
                ),
        )
        .subcommand(
            Command::new("period")
                .about("Manage payroll periods")
                .subcommand(
                    Command::new("add")
                        .about("Create a draft period")
                        .arg(required("label", "Label, e.g. 'January 2025'"))
                        .arg(required("start", "Start date YYYY-MM-DD"))
                        .arg(required("end", "End date YYYY-MM-DD"))
                        .arg(required("pay-date", "Pay date YYYY-MM-DD")),
                )
                .subcommand(Command::new("list").about("List periods").args(json_args()))
                .subcommand(
                    Command::new("show")
                        .about("Show one period with its totals")
                        .arg(required("id", "Period id"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("cancel")
                        .about("Cancel a draft or processing period")
                        .arg(required("id", "Period id")),
                ),
        )
        .subcommand(
            Command::new("earnings")
                .about("Record overtime, holiday pay and allowances per period")
                .subcommand(
                    Command::new("set")
                        .about("Record earnings for one employee")
                        .arg(period_arg())
                        .arg(required("employee", "Employee number"))
                        .arg(optional("overtime", "Overtime pay"))
                        .arg(optional("holiday", "Holiday pay"))
                        .arg(optional("allowances", "Allowances")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List recorded earnings for a period")
                        .arg(period_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("payroll")
                .about("Run and inspect payroll")
                .subcommand(
                    Command::new("run")
                        .about("Compute and store every active employee's pay for a period")
                        .arg(period_arg())
                        .arg(earnings_arg())
                        .arg(optional("date", "Processed date YYYY-MM-DD (default today)"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("preview")
                        .about("Compute a period without storing anything")
                        .arg(period_arg())
                        .arg(earnings_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("records")
                        .about("Show stored records for a period")
                        .arg(period_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("calc")
                .about("Contribution and tax breakdown for one monthly salary")
                .arg(required("salary", "Monthly basic salary"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("import").about("Bulk imports").subcommand(
                Command::new("employees")
                    .about("Import employees from CSV")
                    .arg(required("path", "CSV file path")),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show").about("Show effective settings"))
                .subcommand(
                    Command::new("set")
                        .about("Change a setting")
                        .arg(required("key", "Setting name"))
                        .arg(required("value", "Setting value")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check roster and period consistency"))
}
