//! # Console Menu
//!
//! The presentation side of Scriptdeck. It only knows labels and an "entry i selected"
//! event; launching is done by whatever callback the caller passes in.

use std::io::{self, BufRead, Write};
use std::path::Path;
use serde::Serialize;
use crate::scanner::ScriptDescriptor;

pub const ELEVATED_SUFFIX: &str = " (requires administrator)";

/// One selectable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: String,
    pub elevated: bool,
}

/// Builds the menu entries, in scan order.
pub fn entries(scripts: &[ScriptDescriptor]) -> Vec<MenuEntry> {
    scripts
        .iter()
        .map(|s| {
            let mut label = s.name().to_string();
            if s.requires_elevation() {
                label.push_str(ELEVATED_SUFFIX);
            }
            MenuEntry { label, elevated: s.requires_elevation() }
        })
        .collect()
}

/// What a line of user input means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    /// Zero-based entry index.
    Entry(usize),
    Quit,
    Invalid,
}

fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Selection::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Entry(n - 1),
        _ => Selection::Invalid,
    }
}

/// Prints entries as a numbered list (1-based).
pub fn render<W: Write>(out: &mut W, entries: &[MenuEntry]) -> io::Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "  {:>2}. {}", i + 1, entry.label)?;
    }
    Ok(())
}

/// Runs the interactive loop until `q` or end of input.
///
/// `on_select` is called with the chosen script. It must not fail the menu; the
/// launcher logs its own errors, so the user can simply pick again.
pub fn run<R, W, F>(
    dir: &Path,
    scripts: &[ScriptDescriptor],
    mut input: R,
    out: &mut W,
    mut on_select: F,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&ScriptDescriptor),
{
    let entries = entries(scripts);
    if entries.is_empty() {
        writeln!(out, "No .ps1 scripts found in {}", dir.display())?;
        return Ok(());
    }

    writeln!(out, "Scripts in {}:", dir.display())?;
    render(out, &entries)?;

    let mut line = String::new();
    loop {
        write!(out, "Select [1-{}] or q to quit: ", entries.len())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match parse_selection(&line, entries.len()) {
            Selection::Entry(i) => {
                writeln!(out, "Launching {}", entries[i].label)?;
                on_select(&scripts[i]);
            }
            Selection::Quit => return Ok(()),
            Selection::Invalid => {
                if !line.trim().is_empty() {
                    writeln!(out, "Not a valid choice: {}", line.trim())?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripts() -> Vec<ScriptDescriptor> {
        vec![
            ScriptDescriptor::new("cleanup", "/s/cleanup.ps1", false),
            ScriptDescriptor::new("fix-spooler", "/s/fix-spooler.ps1", true),
        ]
    }

    fn run_with(input: &str, scripts: &[ScriptDescriptor]) -> (String, Vec<String>) {
        let mut out = Vec::new();
        let mut selected = Vec::new();
        run(Path::new("/s"), scripts, Cursor::new(input), &mut out, |s| {
            selected.push(s.name().to_string())
        })
        .unwrap();
        (String::from_utf8(out).unwrap(), selected)
    }

    #[test]
    fn test_entries_mark_elevated() {
        let e = entries(&scripts());
        assert_eq!(e[0], MenuEntry { label: "cleanup".into(), elevated: false });
        assert_eq!(
            e[1],
            MenuEntry { label: "fix-spooler (requires administrator)".into(), elevated: true }
        );
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1\n", 2), Selection::Entry(0));
        assert_eq!(parse_selection(" 2 ", 2), Selection::Entry(1));
        assert_eq!(parse_selection("0", 2), Selection::Invalid);
        assert_eq!(parse_selection("3", 2), Selection::Invalid);
        assert_eq!(parse_selection("abc", 2), Selection::Invalid);
        assert_eq!(parse_selection("Q", 2), Selection::Quit);
        assert_eq!(parse_selection("quit\r\n", 2), Selection::Quit);
    }

    #[test]
    fn test_selections_invoke_callback_until_quit() {
        let (out, selected) = run_with("2\nbogus\n1\n2\nq\n1\n", &scripts());
        assert_eq!(selected, vec!["fix-spooler", "cleanup", "fix-spooler"]);
        assert!(out.contains(" 1. cleanup"));
        assert!(out.contains(" 2. fix-spooler (requires administrator)"));
        assert!(out.contains("Not a valid choice: bogus"));
    }

    #[test]
    fn test_eof_ends_menu() {
        let (_, selected) = run_with("1\n", &scripts());
        assert_eq!(selected, vec!["cleanup"]);
    }

    #[test]
    fn test_empty_list_shows_nothing_found() {
        let (out, selected) = run_with("1\n", &[]);
        assert!(out.starts_with("No .ps1 scripts found in"));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_entries_serialize_for_json_listing() {
        let json = serde_json::to_string(&entries(&scripts())).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"label":"cleanup","elevated":false},"#,
                r#"{"label":"fix-spooler (requires administrator)","elevated":true}]"#
            )
        );
    }
}
