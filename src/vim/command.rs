use thiserror::Error;

/// Commands accepted on the `:` line of the deboard wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Notify,
    Proceed,
    Deboard,
    Reset,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Empty command")]
    Empty,
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let cmd = input.split_whitespace().next().unwrap_or("");

    match cmd {
        "notify" | "n" => Ok(Command::Notify),
        "proceed" | "p" => Ok(Command::Proceed),
        "deboard" | "confirm" => Ok(Command::Deboard),
        "reset" | "cancel" | "r" => Ok(Command::Reset),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "" => Err(CommandError::Empty),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
