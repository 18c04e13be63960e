//! Console input parsing.
//!
//! A line is either a command word (`help`, `quit`) or an action followed
//! by `key=value` pairs. Values containing spaces are double-quoted:
//!
//! ```text
//! search query="productivity apps" count=5 fields=appId,title
//! ```

use gplay_dispatch::Request;
use thiserror::Error;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dispatch an action
    Run {
        /// Action name as typed
        action: String,
        /// Parameters for the action
        request: Request,
    },
    /// Print usage
    Help,
    /// Leave the console
    Quit,
    /// Blank line
    Empty,
}

/// Problems with a console line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A double quote was opened but never closed
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// A parameter was not written as `key=value`
    #[error("expected key=value, got '{0}'")]
    NotKeyValue(String),
}

/// Parse one line of console input.
pub fn parse_line(line: &str) -> Result<Command, InputError> {
    let mut tokens = tokenize(line)?.into_iter();

    let Some(head) = tokens.next() else {
        return Ok(Command::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let mut pairs = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => pairs.push((key.to_string(), value.to_string())),
            _ => return Err(InputError::NotKeyValue(token)),
        }
    }

    Ok(Command::Run {
        action: head,
        request: Request::from_pairs(pairs),
    })
}

/// Split on whitespace outside double quotes. Quotes are removed; `\"`
/// and `\\` inside quotes stand for themselves.
fn tokenize(line: &str) -> Result<Vec<String>, InputError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => match chars.next() {
                Some(next @ ('"' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => return Err(InputError::UnterminatedQuote),
            },
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(InputError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
