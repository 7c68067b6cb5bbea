// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn domain_arg() -> Arg {
    Arg::new("domain")
        .long("domain")
        .required(true)
        .help("Registry to operate on: asset or budget")
}

fn yes_flag() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Confirm the operation")
}

fn asset_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(Arg::new("category").long("category").required(required))
        .arg(
            Arg::new("value")
                .long("value")
                .required(required)
                .allow_hyphen_values(true),
        )
        .arg(Arg::new("target").long("target").help("Target value"))
        .arg(
            Arg::new("months")
                .long("months")
                .value_parser(value_parser!(u32))
                .help("Months to reach the target"),
        )
        .arg(Arg::new("color").long("color"))
        .arg(Arg::new("notes").long("notes"))
}

fn budget_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("category").long("category").required(required))
        .arg(Arg::new("sub").long("sub").help("Sub-category"))
        .arg(Arg::new("amount").long("amount").required(required).help("Monthly amount"))
        .arg(
            Arg::new("carry")
                .long("carry")
                .allow_hyphen_values(true)
                .help("Carry-over from previous months"),
        )
        .arg(Arg::new("color").long("color"))
        .arg(Arg::new("notes").long("notes"))
}

pub fn build_cli() -> Command {
    Command::new("nestegg")
        .about("Net worth tracking and category budgets")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("asset")
                .about("Manage assets and liabilities")
                .subcommand(asset_fields(Command::new("add"), true))
                .subcommand(
                    asset_fields(Command::new("update"), false)
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("category")
                            .long("category")
                            .help("Override the active filter"),
                    ),
                ))
                .subcommand(json_flags(
                    Command::new("history").arg(Arg::new("id").long("id").required(true)),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage monthly budgets")
                .subcommand(budget_fields(Command::new("add"), true))
                .subcommand(
                    budget_fields(Command::new("update"), false)
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("spent")
                                .long("spent")
                                .help("Overwrite this month's spend"),
                        ),
                )
                .subcommand(
                    Command::new("spend")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(
                    Command::new("transactions").arg(Arg::new("id").long("id").required(true)),
                ))
                .subcommand(
                    Command::new("rollover")
                        .about("Close the month: move leftovers into carry-over")
                        .arg(yes_flag()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage category registries")
                .subcommand(
                    Command::new("add")
                        .arg(domain_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("rename")
                        .arg(domain_arg())
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(domain_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(yes_flag()),
                )
                .subcommand(
                    Command::new("move")
                        .arg(domain_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .value_parser(value_parser!(usize))
                                .help("New zero-based position"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(domain_arg())))
                .subcommand(
                    Command::new("color")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("color").long("color").required(true)),
                )
                .subcommand(
                    Command::new("liability")
                        .about("Mark an asset category as a liability (or not)")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("off")
                                .long("off")
                                .action(ArgAction::SetTrue)
                                .help("Unmark instead"),
                        ),
                ),
        )
        .subcommand(
            Command::new("filter")
                .about("Active category filters")
                .subcommand(
                    Command::new("set")
                        .arg(domain_arg())
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(
            Command::new("report")
                .about("Net worth and budget reports")
                .subcommand(json_flags(Command::new("summary")))
                .subcommand(json_flags(Command::new("trend")))
                .subcommand(json_flags(Command::new("goals"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("snapshot")
                        .about("Every persisted key in one JSON document")
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("assets")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("snapshot")
                        .about("Replace all data with a snapshot")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(yes_flag()),
                )
                .subcommand(
                    Command::new("transactions")
                        .about("Record spend rows (date,amount,note) against one budget")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(Arg::new("budget").long("budget").required(true)),
                ),
        )
        .subcommand(json_flags(
            Command::new("insight").about("Ask the AI advisor about your assets"),
        ))
        .subcommand(
            Command::new("settings")
                .about("Theme and display preferences")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("theme").arg(Arg::new("color").long("color").required(true)),
                )
                .subcommand(
                    Command::new("display")
                        .arg(
                            Arg::new("hide-amounts")
                                .long("hide-amounts")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("dark")
                                .long("dark")
                                .value_parser(value_parser!(bool)),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}
