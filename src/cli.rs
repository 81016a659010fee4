// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    let a = Arg::new("month").long("month").help("Month, YYYY-MM");
    if required {
        a.required(true)
    } else {
        a.help("Month, YYYY-MM (defaults to the current month)")
    }
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

// Validation of the sign happens in the ledger, not in clap.
fn amount(help: &'static str) -> Arg {
    req("amount", help).allow_negative_numbers(true)
}

fn snapshot_cmd(name: &'static str, about: &'static str, with_rate: bool) -> Command {
    let rate = || {
        Arg::new("rate")
            .long("rate")
            .help("Annual interest rate (percent)")
            .allow_negative_numbers(true)
            .default_value("0")
    };
    let mut add = Command::new("add")
        .about(format!("Add a {}", name))
        .arg(req("name", "Display name"))
        .arg(amount("Current value"));
    let mut update = Command::new("update")
        .about(format!("Update a {} and record its new value", name))
        .arg(req("id", "Row id"))
        .arg(req("name", "Display name"))
        .arg(amount("Current value"));
    if with_rate {
        add = add.arg(rate());
        update = update.arg(rate());
    }
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(add)
        .subcommand(update)
        .subcommand(
            Command::new("rm")
                .about(format!("Delete a {} (history is kept)", name))
                .arg(req("id", "Row id")),
        )
        .subcommand(json_flags(
            Command::new("list").about(format!("List every {}, newest first", name)),
        ))
        .subcommand(json_flags(
            Command::new("history")
                .about("Show recorded values, oldest first")
                .arg(req("id", "Row id")),
        ))
}

pub fn build_cli() -> Command {
    Command::new("coinpurse")
        .version(crate_version!())
        .about("Personal cash-flow ledger with monthly envelopes and net-worth snapshots")
        .subcommand(Command::new("init").about("Create the database if needed"))
        .subcommand(
            Command::new("income")
                .about("Record and list income")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record an income event")
                        .arg(amount("Amount, non-negative"))
                        .arg(opt("date", "YYYY-MM-DD[THH:MM] (defaults to now)"))
                        .arg(opt("note", "Free-form description")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List income for a month, newest first")
                        .arg(month_arg(false)),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record an expense event")
                        .arg(amount("Amount, non-negative"))
                        .arg(req("l1", "Survival|Social|Enjoyment|Development"))
                        .arg(
                            Arg::new("l2")
                                .long("l2")
                                .help("Envelope: Fixed|Flexible")
                                .default_value("Flexible"),
                        )
                        .arg(opt("date", "YYYY-MM-DD[THH:MM] (defaults to now)"))
                        .arg(opt("note", "Free-form description")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expenses for a month, newest first")
                        .arg(month_arg(false)),
                ))
                .subcommand(json_flags(
                    Command::new("day")
                        .about("List expenses booked on one day")
                        .arg(opt("date", "YYYY-MM-DD (defaults to today)")),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly Fixed/Flexible envelopes")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .about("Set (overwrite) the envelopes for a month")
                        .arg(month_arg(true))
                        .arg(req("fixed", "Fixed envelope"))
                        .arg(req("flexible", "Flexible envelope")),
                )
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show envelopes and utilization for a month")
                        .arg(month_arg(false)),
                )),
        )
        .subcommand(snapshot_cmd("asset", "Track asset values", false))
        .subcommand(snapshot_cmd("liability", "Track liability values", true))
        .subcommand(
            Command::new("report")
                .about("Derived views")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Income, spend and today's allowance for a month")
                        .arg(month_arg(false)),
                ))
                .subcommand(json_flags(
                    Command::new("calendar")
                        .about("Per-day flexible spend status for a month")
                        .arg(month_arg(false)),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Spend by category for a month")
                        .arg(month_arg(false)),
                ))
                .subcommand(json_flags(
                    Command::new("networth").about("Assets minus liabilities"),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("events")
                        .about("Export a month of income and expenses")
                        .arg(month_arg(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(req("out", "Output file")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check snapshot history consistency"))
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Show settings"))
                .subcommand(
                    Command::new("set-symbol")
                        .about("Set the currency symbol used in tables")
                        .arg(Arg::new("symbol").required(true)),
                ),
        )
}
