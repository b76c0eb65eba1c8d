// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

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

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Calendar month (defaults to the current month)")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("carteira")
        .version(clap::crate_version!())
        .about("Personal finance tracker: transactions, card installments, fixed expenses, purchase plans")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the database and local settings"))
        .subcommand(
            Command::new("profile")
                .about("Manage the signed-in user")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Create a profile")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("use")
                        .about("Sign in as a profile (name or id)")
                        .arg(Arg::new("profile").required(true)),
                )
                .subcommand(Command::new("logout").about("Sign out"))
                .subcommand(Command::new("show").about("Show the signed-in profile"))
                .subcommand(Command::new("list").about("List profiles")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction (credit purchases may be split into installments)")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(
                            Arg::new("credit")
                                .long("credit")
                                .action(ArgAction::SetTrue)
                                .help("Paid with a credit card"),
                        )
                        .arg(Arg::new("card").long("card").help("Credit card name"))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .value_parser(value_parser!(u32).range(1..))
                                .default_value("1"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(month_arg())
                        .arg(Arg::new("type").long("type").help("income|expense"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update a single transaction")
                        .arg(id_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("card").long("card")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction (and the rest of its installment group)")
                        .arg(id_arg()),
                )
                .subcommand(Command::new("sample").about("Load demo transactions"))
                .subcommand(
                    Command::new("clear")
                        .about("Delete every transaction of the signed-in user")
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm"),
                        ),
                ),
        )
        .subcommand(
            Command::new("fixed")
                .about("Fixed monthly expenses")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Create a fixed expense and its monthly transactions")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Total amount, split evenly across the months"),
                        )
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .default_value("1"),
                        )
                        .arg(Arg::new("category").long("category").default_value("bills"))
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .value_parser(value_parser!(u32))
                                .default_value("1"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List active fixed expenses"),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update a fixed expense template")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Deactivate a fixed expense (its transactions are kept)")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Mark a fixed-expense transaction as paid")
                        .arg(
                            Arg::new("tx")
                                .long("tx")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("undo")
                                .long("undo")
                                .action(ArgAction::SetTrue)
                                .help("Mark as unpaid instead"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("month")
                        .about("Fixed-expense transactions due in a calendar month")
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("plan")
                .about("Future purchases")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Add a planned purchase")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .default_value("medium")
                                .help("low|medium|high|urgent"),
                        )
                        .arg(Arg::new("category").long("category").default_value("shopping"))
                        .arg(Arg::new("target-date").long("target-date"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List planned purchases")
                        .arg(Arg::new("priority").long("priority"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("all")
                                .help("all|pending|completed"),
                        ),
                ))
                .subcommand(
                    Command::new("done")
                        .about("Toggle a purchase's completed flag")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Update a planned purchase")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("price").long("price"))
                        .arg(Arg::new("priority").long("priority"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("target-date").long("target-date"))
                        .arg(
                            Arg::new("no-target-date")
                                .long("no-target-date")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("target-date"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").about("Delete a planned purchase").arg(id_arg())),
        )
        .subcommand(
            Command::new("card")
                .about("Credit-card billing settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Show the billing day"))
                .subcommand(
                    Command::new("set-day")
                        .about("Set the statement closing day (1-31)")
                        .arg(
                            Arg::new("day")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("cycle")
                        .about("Normal and installment expenses in the current statement")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Reference date (defaults to today)"),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Income, expenses and balance for a month")
                        .arg(month_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Totals per category for a month")
                        .arg(month_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income|expense"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("trend")
                        .about("Monthly income and expenses for recent months")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32).range(1..=1200))
                                .default_value("6"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("analysis")
                        .about("Savings rate, expense rate and insights for a month")
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .about("Write transactions to CSV or JSON")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(month_arg()),
                ),
        )
}
