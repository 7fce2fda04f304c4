//! # Terminal Renderer
//!
//! Writes response records and session views as boxed panels. Everything it
//! receives that could carry a credential has already been masked, except the
//! default headers and presets, which it masks itself.

use anyhow::Result;
use std::io::Write;

use crate::repl::commands::HELP_TEXT;
use crate::repl::models::{
    DefaultHeader, DefaultHeaders, HeaderField, History, Presets, ResponseBody, ResponseRecord,
    HISTORY_DISPLAY_LIMIT,
};
use crate::repl::pipeline::{mask_value, SecretMasker, VariableTable};
use crate::repl::views::ansi_escape_codes::*;

/// Width of rules and panel borders in columns
const PANEL_WIDTH: usize = 72;

/// Placeholder for an absent value in tables
const ABSENT: &str = "—";

const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Renders to any writer; colour is applied only when enabled
pub struct TerminalRenderer<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color && !style.is_empty() {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn rule(&mut self, title: &str) -> Result<()> {
        let title = format!(" {title} ");
        let side = PANEL_WIDTH.saturating_sub(title.chars().count()) / 2;
        let line = format!(
            "{}{}{}",
            "─".repeat(side),
            self.paint(BOLD_GREEN, &title),
            "─".repeat(side)
        );
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Draw a panel with a titled top border and a left edge
    fn panel<S: AsRef<str>>(&mut self, title: &str, style: &str, lines: &[S]) -> Result<()> {
        let head = format!("╭─ {title} ");
        let fill = PANEL_WIDTH.saturating_sub(head.chars().count());
        let top = self.paint(style, &format!("{head}{}", "─".repeat(fill)));
        let edge = self.paint(style, "│");
        let bottom = self.paint(style, &format!("╰{}", "─".repeat(PANEL_WIDTH - 1)));

        writeln!(self.writer, "{top}")?;
        for line in lines {
            writeln!(self.writer, "{edge} {}", line.as_ref())?;
        }
        writeln!(self.writer, "{bottom}")?;
        Ok(())
    }

    /// Lay out rows as padded columns.
    ///
    /// With a header the header row is styled; without one the first column
    /// is treated as keys and painted with `key_style`.
    fn table(&self, header: Option<&[&str]>, rows: &[Vec<String>], key_style: &str) -> Vec<String> {
        let columns = header
            .map(<[&str]>::len)
            .or_else(|| rows.first().map(Vec::len))
            .unwrap_or(0);
        let mut widths = vec![0usize; columns];
        let cells = header
            .into_iter()
            .map(|h| h.to_vec())
            .chain(rows.iter().map(|row| row.iter().map(String::as_str).collect::<Vec<&str>>()));
        for row in cells {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        if let Some(header) = header {
            lines.push(self.table_row(header, &widths, BOLD_MAGENTA, true));
        }
        for row in rows {
            let row: Vec<&str> = row.iter().map(String::as_str).collect();
            let style = if header.is_some() { "" } else { key_style };
            lines.push(self.table_row(&row, &widths, style, false));
        }
        lines
    }

    /// Pad one row; `style` paints every cell or only the key column
    fn table_row(&self, cells: &[&str], widths: &[usize], style: &str, whole_row: bool) -> String {
        let last = widths.len().saturating_sub(1);
        cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                let text = if i == last {
                    cell.to_string()
                } else {
                    let pad = width.saturating_sub(cell.chars().count());
                    format!("{cell}{}", " ".repeat(pad))
                };
                if whole_row || i == 0 {
                    self.paint(style, &text)
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render_banner(&mut self) -> Result<()> {
        let title = self.paint(BOLD_CYAN, &format!("{APP_NAME} (REPL)"));
        writeln!(self.writer, "{title}. Type :help for commands.")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Render one execution: command, status, headers, body and stderr
    pub fn render_record(&mut self, record: &ResponseRecord) -> Result<()> {
        self.rule(APP_NAME)?;
        self.panel(
            &format!("Command @ {}", record.executed_at),
            BOLD,
            &record.command.lines().collect::<Vec<_>>(),
        )?;

        let exit_code = if record.interrupted {
            format!("{} (interrupted)", record.exit_code)
        } else {
            record.exit_code.to_string()
        };
        let mut status_rows = vec![
            vec!["Exit Code".to_string(), exit_code],
            vec![
                "HTTP Status".to_string(),
                record
                    .status_code
                    .map_or_else(|| ABSENT.to_string(), |code| code.to_string()),
            ],
        ];
        if let Some(seconds) = record.elapsed_seconds {
            status_rows.push(vec!["Total Time (s)".to_string(), format!("{seconds:.3}")]);
        }
        if let Some(remote) = &record.remote_address {
            status_rows.push(vec!["Remote IP".to_string(), remote.clone()]);
        }
        let status_style = if record.succeeded() { FG_GREEN } else { FG_RED };
        let status_lines = self.table(None, &status_rows, BOLD_CYAN);
        self.panel("Status", status_style, &status_lines)?;

        if !record.headers.is_empty() {
            let rows: Vec<Vec<String>> = record
                .headers
                .iter()
                .map(|field| match field {
                    HeaderField::Status(line) => vec!["(status)".to_string(), line.clone()],
                    HeaderField::Field { name, value } => vec![name.clone(), value.clone()],
                })
                .collect();
            let lines = self.table(Some(&["Header", "Value"][..]), &rows, "");
            self.panel("Response Headers", FG_CYAN, &lines)?;
        }

        match &record.body {
            ResponseBody::Empty => {}
            ResponseBody::Json(pretty) => {
                let lines = self.numbered(pretty);
                self.panel("Response Body (JSON)", FG_GREEN, &lines)?;
            }
            ResponseBody::Raw(text) => {
                let lines = self.numbered(text);
                self.panel("Response Body (Raw)", FG_YELLOW, &lines)?;
            }
        }

        if !record.stderr.is_empty() {
            let lines: Vec<String> = record
                .stderr
                .lines()
                .map(|line| self.paint(FG_RED, line))
                .collect();
            self.panel("stderr", FG_RED, &lines)?;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn numbered(&self, text: &str) -> Vec<String> {
        let total = text.lines().count();
        let width = total.to_string().len();
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                let number = self.paint(DIM, &format!("{:>width$}", i + 1));
                format!("{number} {line}")
            })
            .collect()
    }

    pub fn render_history(&mut self, history: &History, masker: &SecretMasker) -> Result<()> {
        let rows: Vec<Vec<String>> = history
            .recent(HISTORY_DISPLAY_LIMIT)
            .map(|(id, entry)| {
                vec![
                    id.to_string(),
                    entry.timestamp.clone(),
                    entry
                        .status
                        .map_or_else(|| ABSENT.to_string(), |code| code.to_string()),
                    masker.mask(entry.display_command()),
                ]
            })
            .collect();
        let lines = self.table(Some(&["ID", "Time", "HTTP", "Command (masked)"][..]), &rows, "");
        self.panel(
            &format!("History (last {HISTORY_DISPLAY_LIMIT})"),
            "",
            &lines,
        )
    }

    pub fn render_presets(&mut self, presets: &Presets, masker: &SecretMasker) -> Result<()> {
        if presets.is_empty() {
            return self.render_warning("No presets saved.");
        }
        let rows: Vec<Vec<String>> = presets
            .iter()
            .map(|(name, command)| vec![name.clone(), masker.mask(command)])
            .collect();
        let lines = self.table(Some(&["Name", "Command (masked)"][..]), &rows, "");
        self.panel("Presets", "", &lines)
    }

    pub fn render_loaded_preset(&mut self, name: &str, masked_command: &str) -> Result<()> {
        let mut lines: Vec<&str> = masked_command.lines().collect();
        lines.push("");
        lines.push("Type 'e' to execute.");
        self.panel(&format!("Loaded preset: {name}"), FG_CYAN, &lines)
    }

    pub fn render_defaults(&mut self, defaults: &DefaultHeaders) -> Result<()> {
        let rows: Vec<Vec<String>> = DefaultHeader::ALL
            .iter()
            .map(|&header| {
                let value = defaults.get(header);
                let shown = if value.is_empty() {
                    header.unset_label().to_string()
                } else if header == DefaultHeader::Authorization {
                    mask_value(value)
                } else {
                    value.to_string()
                };
                vec![header.header_name().to_string(), shown]
            })
            .collect();
        let lines = self.table(None, &rows, BOLD_CYAN);
        self.panel("Default Headers", "", &lines)
    }

    pub fn render_variables(&mut self, vars: &VariableTable) -> Result<()> {
        if vars.is_empty() {
            return self.panel(
                "Vars",
                FG_CYAN,
                &["No variables set. Use `:set KEY value` and reference as {{KEY}}."],
            );
        }
        let rows: Vec<Vec<String>> = vars
            .iter()
            .map(|(key, value)| vec![key.clone(), value.clone()])
            .collect();
        let lines = self.table(Some(&["Key", "Value"][..]), &rows, "");
        self.panel("Vars", "", &lines)
    }

    pub fn render_help(&mut self) -> Result<()> {
        self.panel("Help", "", &HELP_TEXT.lines().collect::<Vec<_>>())
    }

    pub fn render_paste_intro(&mut self) -> Result<()> {
        self.panel(
            "Paste Mode",
            FG_CYAN,
            &[
                "Paste your full curl (multi-line OK).",
                "End with a single dot `.` on its own line.",
            ],
        )
    }

    pub fn render_success(&mut self, message: &str) -> Result<()> {
        let line = self.paint(FG_GREEN, message);
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    pub fn render_warning(&mut self, message: &str) -> Result<()> {
        let line = self.paint(FG_YELLOW, message);
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    pub fn render_error(&mut self, message: &str) -> Result<()> {
        let line = self.paint(FG_RED, message);
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    pub fn render_plain(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")?;
        self.writer.flush()?;
        Ok(())
    }
}
