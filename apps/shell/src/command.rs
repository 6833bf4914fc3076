//! One line of interactive input.

use sailor_domain::constants::LOGOUT;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  <module>        open a module
  close           clear the content area
  retry           retry the last failed load
  reload <module> drop the cached copy and open it again
  toggle <module> enable or disable a module for this user
  refresh         fetch entitlements again
  collapse        collapse or expand the navigation
  list            list available modules
  help            show this text
  logout          end the session
  quit            leave without signing out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Close,
    Retry,
    Reload(String),
    Toggle(String),
    Refresh,
    Collapse,
    List,
    Help,
    Logout,
    Quit,
    /// Blank line.
    Nothing,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {command} <module>")]
    MissingModule { command: &'static str },
    #[error("Unexpected argument for '{command}': {extra}")]
    UnexpectedArgument { command: String, extra: String },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Nothing);
        };
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument {
                command: head.to_owned(),
                extra: extra.to_owned(),
            });
        }

        let command = match (head, argument) {
            ("reload", Some(name)) => Self::Reload(name.to_owned()),
            ("toggle", Some(name)) => Self::Toggle(name.to_owned()),
            ("reload", None) => return Err(CommandError::MissingModule { command: "reload" }),
            ("toggle", None) => return Err(CommandError::MissingModule { command: "toggle" }),
            (_, Some(extra)) => {
                return Err(CommandError::UnexpectedArgument {
                    command: head.to_owned(),
                    extra: extra.to_owned(),
                });
            },
            ("close", None) => Self::Close,
            ("retry", None) => Self::Retry,
            ("refresh", None) => Self::Refresh,
            ("collapse", None) => Self::Collapse,
            ("list", None) => Self::List,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            (LOGOUT, None) => Self::Logout,
            (name, None) => Self::Select(name.to_owned()),
        };
        Ok(command)
    }
}
