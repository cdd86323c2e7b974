use std::{
    io::{self, Write},
    sync::{Arc, PoisonError, RwLock},
};

use colored::Colorize;
use log::info;

use crate::{
    cli::{
        colors::TABULA_TEAL,
        commands::{CommandExecutor, CommandResult, render_cursor},
        messages::{highlight_argument, system_message, warning_message},
        parsers::parse_command,
    },
    config::EngineConfig,
    persistence::Catalog,
    sessions::session::Session,
};

mod colors;
pub mod commands;
mod messages;
pub mod parsers;
mod splash_screen;

const DEFAULT_LAST_COMMAND_DELIMITER: &str = "!";

const TABULA_SHELL_COMMANDS_LIST: [(&str, &str); 18] = [
    ("tables", "list all tables with their sizes"),
    ("create", "create <table>, a table with no columns"),
    ("use", "use <table>, focus on a table"),
    ("droptable", "droptable <table>"),
    ("column", "column <name> <default>, the default decides the type"),
    ("drop", "drop <column>"),
    ("insert", "insert <value>*, in column order"),
    ("select", "select [cols|*] [where col op value] [order col asc|desc]"),
    ("delete", "delete [index | where col op value]"),
    ("update", "update <col> <value> [where col op value]"),
    ("sort", "sort <col> [asc|desc], reorder the stored rows"),
    ("json", "print the last query result as JSON"),
    ("history", "list command history for this session"),
    ("!", "execute the last command, add more to go further back"),
    ("help", "list all available commands"),
    ("quit", "close the session and leave"),
    ("ops", "= != < <= > >= and ~ (contains)"),
    (
        "values",
        "null true 42 4.2 'text' d'2024-01-31' t'12:30' dt'2024-01-31 12:30:00' j'{}'",
    ),
];

const DEMO_SCRIPT: [&str; 14] = [
    "create people",
    "use people",
    "column name ''",
    "column age 0",
    "column joined d'2000-01-01'",
    "insert 'Ann Lee' 31 d'2019-03-01'",
    "insert 'Bob Marsh' 25",
    "insert 'Cid Moor' null d'2021-11-15'",
    "select * order age desc",
    "update age 26 where name ~ Bob",
    "select name age where age >= 26",
    "json",
    "delete where age = null",
    "tables",
];

fn _new_session(config: &EngineConfig) -> Arc<RwLock<Session>> {
    let catalog = Arc::new(RwLock::new(Catalog::new()));
    Arc::new(RwLock::new(Session::client(&catalog, config.history_limit)))
}

pub fn run_client(config: EngineConfig) {
    if config.show_splash {
        splash_screen::splash_screen();
    }

    let session = _new_session(&config);
    println!(
        "{}",
        system_message(
            "info",
            "A fresh table catalog was created at the session level.".to_string()
        )
    );

    start_repl(session, &config);
}

pub fn run_demo(config: EngineConfig) {
    //! Run a fixed script through the same executor the shell uses.

    let session = _new_session(&config);
    info!("running demo script of {} commands", DEMO_SCRIPT.len());

    for line in DEMO_SCRIPT {
        println!();
        println!("{:6} > {}", "tabula".color(TABULA_TEAL).bold(), line);
        _run_line(&session, line, &config);
    }
}

pub fn show_help() {
    println!();
    println!("{:10} {}", "COMMAND".color(TABULA_TEAL), "DETAILS");
    for (command, details) in TABULA_SHELL_COMMANDS_LIST {
        println!("{:10} {}", command.color(TABULA_TEAL), details)
    }
}

fn _show_result(result: CommandResult, config: &EngineConfig) {
    if let Some(message) = result.message {
        println!("{}", system_message("tabula", message));
    }
    if let Some(cursor) = result.cursor {
        println!("{}", render_cursor(&cursor, &config.null_display));
        println!("{}", system_message("tabula", cursor.summary()));
    } else if let Some(n_rows) = result.n_rows_processed {
        println!(
            "{}",
            system_message("tabula", format!("{} row(s) processed!", n_rows))
        );
    }
}

fn _run_line(session: &Arc<RwLock<Session>>, line: &str, config: &EngineConfig) {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(error) => {
            println!("{}", system_message("parser", highlight_argument(&error)));
            return;
        }
    };

    match CommandExecutor::new(command, session).execute() {
        Ok(result) => _show_result(result, config),
        Err(error) => println!("{}", error),
    }
}

fn start_repl(client_session: Arc<RwLock<Session>>, config: &EngineConfig) {
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "Use '{}' to leave and '{}' to know all commands available.",
                highlight_argument("quit"),
                highlight_argument("help"),
            ),
        )
    );

    {
        let session = client_session.read().unwrap_or_else(PoisonError::into_inner);
        println!(
            "{}",
            system_message(
                "system",
                format!(
                    "New session initiated at '{}'.",
                    highlight_argument(&session.start_time_string())
                ),
            )
        );
    }

    loop {
        println!();
        print!("{:6} > ", "tabula".color(TABULA_TEAL).bold());
        if io::stdout().flush().is_err() {
            break;
        }

        let mut buffer = String::new();
        match io::stdin().read_line(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        if buffer.trim().is_empty() {
            continue;
        }

        if buffer.starts_with(DEFAULT_LAST_COMMAND_DELIMITER) {
            let session = client_session.read().unwrap_or_else(PoisonError::into_inner);
            let last = buffer.matches(DEFAULT_LAST_COMMAND_DELIMITER).count();

            match session.get_last_command(last) {
                Some(command) => buffer = command.to_string(),
                None => {
                    println!(
                        "{}",
                        warning_message(
                            "system",
                            format!(
                                "No command {} steps back.",
                                highlight_argument(&last.to_string())
                            ),
                        )
                    );
                    continue;
                }
            }
        }

        {
            let mut session = client_session.write().unwrap_or_else(PoisonError::into_inner);
            session.add_to_command_history(buffer.trim());
        }

        match buffer.trim() {
            "history" => {
                let session = client_session.read().unwrap_or_else(PoisonError::into_inner);
                session.show_command_history(None);
            }
            "help" => show_help(),
            "exit" => println!("did you mean '{}'?", "quit".color(TABULA_TEAL)),
            "quit" => break,
            line => _run_line(&client_session, line, config),
        }
    }

    println!("Goodbye!")
}
