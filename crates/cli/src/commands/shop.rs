use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use basket_core::config::{AppConfig, LoadOptions};
use basket_core::{ApplicationError, Category, DomainError, ProductId, ShopSession};
use thiserror::Error;

use crate::commands::{load_session, CommandResult, EXIT_CATALOG, EXIT_CONFIG, EXIT_SCRIPT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShopCommand {
    Choose(Category),
    Reset,
    Add(ProductId),
    Remove(ProductId),
    Clear,
    Show,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}` (expected choose|reset|add|remove|clear|show)")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` expects an argument")]
    MissingArgument { line: usize, command: String },
    #[error("line {line}: {source}")]
    InvalidArgument { line: usize, source: ApplicationError },
}

/// Parses one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line_number: usize, raw: &str) -> Result<Option<ShopCommand>, ScriptError> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, Some(argument.trim())),
        None => (line, None),
    };
    let command = command.to_ascii_lowercase();

    let value = || required(line_number, &command, argument);
    let invalid = |error: DomainError| ScriptError::InvalidArgument {
        line: line_number,
        source: error.into(),
    };

    let parsed = match command.as_str() {
        "choose" => ShopCommand::Choose(value()?.parse().map_err(invalid)?),
        "reset" => ShopCommand::Reset,
        "add" => ShopCommand::Add(value()?.parse().map_err(invalid)?),
        "remove" => ShopCommand::Remove(value()?.parse().map_err(invalid)?),
        "clear" => ShopCommand::Clear,
        "show" => ShopCommand::Show,
        _ => {
            return Err(ScriptError::UnknownCommand { line: line_number, command: command.clone() })
        }
    };

    Ok(Some(parsed))
}

fn required<'a>(
    line_number: usize,
    command: &str,
    argument: Option<&'a str>,
) -> Result<&'a str, ScriptError> {
    argument.filter(|value| !value.is_empty()).ok_or_else(|| ScriptError::MissingArgument {
        line: line_number,
        command: command.to_string(),
    })
}

pub fn parse_script(script: &str) -> Result<Vec<ShopCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, raw)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

pub fn run(options: &LoadOptions, script_path: &str) -> CommandResult {
    match read_script(script_path) {
        Ok(script) => run_script(options, &script),
        Err(error) => {
            CommandResult::failure("shop", "script_read", format!("{error:#}"), EXIT_SCRIPT)
        }
    }
}

fn read_script(path: &str) -> Result<String> {
    if path == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).context("failed to read script from stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read script from {path}"))
}

/// Runs every command against a fresh session and returns the transcript.
/// The first failing command stops the run.
pub fn run_script(options: &LoadOptions, script: &str) -> CommandResult {
    let commands = match parse_script(script) {
        Ok(commands) => commands,
        Err(error) => {
            return CommandResult::failure("shop", "script_parse", error.to_string(), EXIT_SCRIPT)
        }
    };

    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "shop",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            )
        }
    };

    let mut session = match load_session(&config.catalog) {
        Ok(session) => session,
        Err(error) => {
            return CommandResult::failure(
                "shop",
                "catalog_load",
                format!("{} ({error})", error.user_message()),
                EXIT_CATALOG,
            )
        }
    };

    let mut transcript = Vec::new();
    if let Some(header) = session.storefront() {
        transcript.push(header.render());
    }

    for command in commands {
        if let Err(error) = apply(&mut session, command, &mut transcript) {
            transcript.push(format!("error: {error} ({})", error.user_message()));
            return CommandResult { exit_code: EXIT_SCRIPT, output: transcript.join("\n") };
        }
    }

    CommandResult { exit_code: 0, output: transcript.join("\n") }
}

fn apply(
    session: &mut ShopSession,
    command: ShopCommand,
    transcript: &mut Vec<String>,
) -> Result<(), ApplicationError> {
    match command {
        ShopCommand::Choose(category) => {
            session.select_category(category);
            transcript.push(format!("> choose {category}"));
        }
        ShopCommand::Reset => {
            session.reset_selection();
            transcript.push("> reset".to_string());
        }
        ShopCommand::Add(pid) => {
            let basket = session.add_to_basket(&pid)?;
            transcript.push(format!("> add {pid} (basket: {} items)", basket.count()));
        }
        ShopCommand::Remove(pid) => {
            let basket = session.remove_from_basket(&pid);
            transcript.push(format!("> remove {pid} (basket: {} items)", basket.count()));
        }
        ShopCommand::Clear => {
            if session.basket_count() == 0 {
                transcript.push("> clear (basket already empty)".to_string());
            } else {
                session.clear_basket();
                transcript.push("> clear".to_string());
            }
        }
        ShopCommand::Show => {
            transcript.push("> show".to_string());
            if let Some(view) = session.catalog_view() {
                transcript.push(view.render());
            }
            transcript.push(session.basket_view().render());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use basket_core::{Category, ProductId};

    use super::{parse_line, parse_script, ScriptError, ShopCommand};

    #[test]
    fn parses_each_command() {
        let commands = parse_script(
            "# morning run\nchoose Fruits\nadd 10\n\nremove 10\nclear\nreset\nSHOW\n",
        )
        .expect("valid script");

        assert_eq!(
            commands,
            vec![
                ShopCommand::Choose(Category::Fruits),
                ShopCommand::Add(ProductId(10)),
                ShopCommand::Remove(ProductId(10)),
                ShopCommand::Clear,
                ShopCommand::Reset,
                ShopCommand::Show,
            ]
        );
    }

    #[test]
    fn reports_unknown_command_with_line_number() {
        let error = parse_script("show\ncheckout").expect_err("checkout is not supported");
        assert_eq!(
            error,
            ScriptError::UnknownCommand { line: 2, command: "checkout".to_string() }
        );
    }

    #[test]
    fn reports_missing_and_invalid_arguments() {
        assert!(matches!(
            parse_line(3, "add"),
            Err(ScriptError::MissingArgument { line: 3, .. })
        ));
        assert!(matches!(
            parse_line(4, "add apple"),
            Err(ScriptError::InvalidArgument { line: 4, .. })
        ));
        assert!(matches!(
            parse_line(5, "choose herbs"),
            Err(ScriptError::InvalidArgument { line: 5, .. })
        ));
    }
}
