use notary_core::AccountId;

/// A line typed on stdin while no password prompt is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Select(AccountId),
    Deselect,
    Remove(AccountId),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs an account name")]
    MissingAccount(&'static str),
}

/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();
    let account = |name: &'static str| -> Result<AccountId, CommandError> {
        if rest.is_empty() {
            Err(CommandError::MissingAccount(name))
        } else {
            Ok(rest.join(" "))
        }
    };

    let command = match head {
        "r" | "refresh" => Command::Refresh,
        "a" | "account" => Command::Select(account("a")?),
        "d" | "deselect" => Command::Deselect,
        "x" | "remove" => Command::Remove(account("x")?),
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

pub const HELP: &str = "commands: r refresh | a <user> select | d deselect | x <user> remove | q quit";
