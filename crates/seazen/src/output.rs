//! Output formatting: table, JSON, YAML, plain.
//!
//! Command results go to stdout in the format selected by `--output`.
//! Onboarding screens, progress and the diagnostic trace are for humans
//! and always go to stderr.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use seazen_core::{Screen, TraceEntry, TraceLevel};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color { style(text) } else { text.to_owned() }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, a pre-formatted "Label: value" block.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// One-line confirmation on stderr, e.g. after `forget`.
pub fn print_success(message: &str, color: bool, quiet: bool) {
    if quiet {
        return;
    }
    let mark = paint("✓", color, |s| s.green().to_string());
    eprintln!("{mark} {message}");
}

pub fn print_warning(message: &str, color: bool) {
    let mark = paint("!", color, |s| s.yellow().bold().to_string());
    eprintln!("{mark} {message}");
}

// ── Onboarding screens ───────────────────────────────────────────────

pub fn print_screen(screen: &Screen, color: bool) {
    let headline = screen.headline();
    eprintln!();
    eprintln!("{}", paint(&headline, color, |s| s.bold().to_string()));
    if let Some(sub) = screen.subline() {
        eprintln!("{}", paint(&sub, color, |s| s.dimmed().to_string()));
    }
}

// ── Diagnostic trace ─────────────────────────────────────────────────

#[derive(Tabled)]
struct TraceRow {
    #[tabled(rename = "Time")]
    at: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Dump the diagnostic trace to stderr in the `--output` format. Plain
/// prints one line per entry, colored by level.
pub fn print_trace(entries: &[TraceEntry], format: &OutputFormat, color: bool) {
    if entries.is_empty() {
        return;
    }
    let rendered = match format {
        OutputFormat::Table => render_list(
            format,
            entries,
            |e| TraceRow {
                at: e.at.format("%H:%M:%S%.3f").to_string(),
                level: e.level.to_string(),
                message: e.message.clone(),
            },
            ToString::to_string,
        ),
        OutputFormat::Json => render_json(entries, false),
        OutputFormat::JsonCompact => render_json(entries, true),
        OutputFormat::Yaml => render_yaml(entries),
        OutputFormat::Plain => entries
            .iter()
            .map(|e| {
                let line = e.to_string();
                match e.level {
                    TraceLevel::Error => paint(&line, color, |s| s.red().to_string()),
                    TraceLevel::Warn => paint(&line, color, |s| s.yellow().to_string()),
                    TraceLevel::Info => line,
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{rendered}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Lamp {
        origin: String,
        on: bool,
    }

    #[derive(Tabled)]
    struct LampRow {
        #[tabled(rename = "Origin")]
        origin: String,
    }

    fn lamps() -> Vec<Lamp> {
        vec![
            Lamp {
                origin: "http://10.0.0.5".into(),
                on: true,
            },
            Lamp {
                origin: "http://seazencity.local".into(),
                on: false,
            },
        ]
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &lamps(),
            |l| LampRow {
                origin: l.origin.clone(),
            },
            |l| l.origin.clone(),
        );
        assert_eq!(out, "http://10.0.0.5\nhttp://seazencity.local");
    }

    #[test]
    fn table_has_headers() {
        let out = render_list(
            &OutputFormat::Table,
            &lamps(),
            |l| LampRow {
                origin: l.origin.clone(),
            },
            |l| l.origin.clone(),
        );
        assert!(out.contains("Origin"));
        assert!(out.contains("seazencity.local"));
    }

    #[test]
    fn compact_json_is_single_line() {
        let lamp = &lamps()[0];
        let out = render_single(&OutputFormat::JsonCompact, lamp, |_| String::new(), |_| {
            String::new()
        });
        assert_eq!(out, r#"{"origin":"http://10.0.0.5","on":true}"#);
    }

    #[test]
    fn color_disabled_leaves_text_untouched() {
        assert_eq!(paint("ready", false, |s| s.green().to_string()), "ready");
        assert_ne!(paint("ready", true, |s| s.green().to_string()), "ready");
    }
}
