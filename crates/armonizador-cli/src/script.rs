//! Message scripts: `;` or newline separated, `#` comments

use anyhow::{bail, Context};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// Forward to the instance as-is
    Send(String),
    /// Advance logical time by this many milliseconds
    Wait(f64),
    /// Print the instance state as JSON
    State,
    /// Destroy and recreate the instance
    Reset,
}

pub(crate) fn parse_script(text: &str) -> anyhow::Result<Vec<Command>> {
    let mut commands = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for chunk in line.split(';') {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            let command = parse_command(chunk).with_context(|| format!("line {}: '{chunk}'", line_no + 1))?;
            commands.push(command);
        }
    }

    Ok(commands)
}

fn parse_command(chunk: &str) -> anyhow::Result<Command> {
    let mut atoms = chunk.split_whitespace();
    match atoms.next() {
        Some("wait") => {
            let Some(ms) = atoms.next() else { bail!("wait needs a duration in ms") };
            let ms: f64 = ms.parse().context("wait duration is not a number")?;
            if !ms.is_finite() || ms < 0.0 {
                bail!("wait duration must be a non-negative number");
            }
            Ok(Command::Wait(ms))
        }
        Some("state") => Ok(Command::State),
        Some("reset") => Ok(Command::Reset),
        _ => Ok(Command::Send(chunk.to_string())),
    }
}
