//! Interactive terminal front end

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::Session;
use crate::catalog::CatalogProvider;
use crate::render::{render_ban_list, render_selection};
use crate::selector::RandomSource;

const HELP: &str = "Commands:
  find            pick another city
  ban             ban the country of the shown city
  unban <name>    remove a country (name or code) from the ban list
  bans            show the ban list
  help            show this help
  quit            leave";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Find,
    Ban,
    Unban(String),
    ListBans,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        Some(match word.to_lowercase().as_str() {
            "find" | "f" => Self::Find,
            "ban" | "b" if rest.is_empty() => Self::Ban,
            "unban" | "u" if !rest.is_empty() => Self::Unban(rest.to_string()),
            "bans" | "list" => Self::ListBans,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        })
    }
}

/// Read commands until `quit` or end of input
pub async fn run<P, R, I, W>(session: &mut Session<P, R>, input: I, out: &mut W) -> Result<()>
where
    P: CatalogProvider,
    R: RandomSource,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Travel the World 🌎  (type 'help' for commands)")?;
    writeln!(out, "{}", render_selection(session.state()))?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };
        match command {
            ShellCommand::Find => {
                session.find_city().await;
                writeln!(out, "{}", render_selection(session.state()))?;
            }
            ShellCommand::Ban => {
                if session.ban_current().await {
                    writeln!(out, "{}", render_ban_list(session.state().banned()))?;
                    writeln!(out, "{}", render_selection(session.state()))?;
                } else {
                    writeln!(out, "Nothing to ban, no city is shown")?;
                }
            }
            ShellCommand::Unban(query) => {
                if session.unban(&query).await {
                    writeln!(out, "{}", render_selection(session.state()))?;
                } else {
                    writeln!(out, "'{query}' is not on the ban list")?;
                }
            }
            ShellCommand::ListBans => {
                writeln!(out, "{}", render_ban_list(session.state().banned()))?;
            }
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => break,
            ShellCommand::Unknown(text) => {
                writeln!(out, "Unknown command '{text}', type 'help'")?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::catalog::StaticCatalog;
    use crate::render::NO_CITIES_MESSAGE;
    use crate::selector::SequenceRandom;
    use rstest::rstest;

    #[rstest]
    #[case("find", Some(ShellCommand::Find))]
    #[case("  F ", Some(ShellCommand::Find))]
    #[case("ban", Some(ShellCommand::Ban))]
    #[case("unban United States", Some(ShellCommand::Unban("United States".to_string())))]
    #[case("bans", Some(ShellCommand::ListBans))]
    #[case("q", Some(ShellCommand::Quit))]
    #[case("", None)]
    #[case("unban", Some(ShellCommand::Unknown("unban".to_string())))]
    #[case("fly", Some(ShellCommand::Unknown("fly".to_string())))]
    fn test_parse(#[case] line: &str, #[case] expected: Option<ShellCommand>) {
        assert_eq!(ShellCommand::parse(line), expected);
    }

    #[tokio::test]
    async fn test_shell_session() {
        let catalog = StaticCatalog::new()
            .with_country("US", "United States", &[("Boston", "Massachusetts", 675_647)])
            .with_country("FR", "France", &[("Paris", "Île-de-France", 2_148_271)]);
        let mut session =
            Session::with_state(catalog, AppState::new(), SequenceRandom::new(vec![0.0]));
        session.load().await;

        let input: &[u8] = b"ban\nbans\nban\nunban us\nquit\nfind\n";
        let mut out = Vec::new();
        run(&mut session, input, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Boston"));
        assert!(text.contains("United States (US)"));
        assert!(text.contains("Paris"));
        assert!(text.contains(NO_CITIES_MESSAGE));
        // Input after quit is not executed.
        assert_eq!(session.state().banned().len(), 1);
        assert_eq!(session.current().map(|c| c.city.as_str()), Some("Boston"));
    }
}
