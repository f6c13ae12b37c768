//! Hours-based invoice: totals, per-task summary and a printable HTML page.
//!
//! DESIGN
//! ======
//! The invoice is computed from a flat list of work entries. Rendering fills
//! `templates/invoice.html` in a single pass, so text substituted from the
//! entries is never scanned again for placeholders.

use std::path::Path;

use serde::{Deserialize, Serialize};

const INVOICE_TEMPLATE: &str = include_str!("../templates/invoice.html");

pub const DEFAULT_ISSUER: &str = "David Alonso";
pub const DEFAULT_ISSUED_ON: &str = "25/03/2025";
pub const DEFAULT_HOURLY_RATE: u32 = 40;

#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid entries file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write invoice: {0}")]
    Write(#[from] std::io::Error),
}

/// One line of billed work. `date` is kept as written (`dd/mm/yyyy`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub date: String,
    pub hours: u32,
    pub task: String,
}

impl WorkEntry {
    fn new(date: &str, hours: u32, task: &str) -> Self {
        Self { date: date.to_owned(), hours, task: task.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub issuer: String,
    pub issued_on: String,
    pub hourly_rate: u32,
    pub entries: Vec<WorkEntry>,
}

impl Invoice {
    #[must_use]
    pub fn total_hours(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.hours)).sum()
    }

    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.total_hours() * u64::from(self.hourly_rate)
    }

    /// Hours per task, in order of first appearance.
    #[must_use]
    pub fn task_summary(&self) -> Vec<(&str, u64)> {
        let mut summary: Vec<(&str, u64)> = Vec::new();
        for entry in &self.entries {
            match summary.iter_mut().find(|(task, _)| *task == entry.task) {
                Some((_, hours)) => *hours += u64::from(entry.hours),
                None => summary.push((entry.task.as_str(), u64::from(entry.hours))),
            }
        }
        summary
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        let entry_rows = self
            .entries
            .iter()
            .map(|e| {
                format!(
                    "          <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                    html_escape(&e.date),
                    html_escape(&e.task),
                    e.hours
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let summary_rows = self
            .task_summary()
            .iter()
            .map(|(task, hours)| {
                format!("            <tr><td>{}</td><td class=\"num\">{hours}</td></tr>", html_escape(task))
            })
            .collect::<Vec<_>>()
            .join("\n");

        fill(
            INVOICE_TEMPLATE,
            &[
                ("ISSUER", html_escape(&self.issuer)),
                ("ISSUED_ON", html_escape(&self.issued_on)),
                ("ENTRY_ROWS", entry_rows),
                ("SUMMARY_ROWS", summary_rows),
                ("TOTAL_HOURS", self.total_hours().to_string()),
                ("RATE", self.hourly_rate.to_string()),
                ("TOTAL_AMOUNT", self.total_amount().to_string()),
            ],
        )
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_owned(),
            issued_on: DEFAULT_ISSUED_ON.to_owned(),
            hourly_rate: DEFAULT_HOURLY_RATE,
            entries: default_entries(),
        }
    }
}

/// Work logged between 26/02/2025 and 24/03/2025.
#[must_use]
pub fn default_entries() -> Vec<WorkEntry> {
    vec![
        WorkEntry::new("26/02/2025", 2, "Diseño"),
        WorkEntry::new("27/02/2025", 2, "Diseño"),
        WorkEntry::new("28/02/2025", 1, "Diseño"),
        WorkEntry::new("02/03/2025", 1, "Prototipo"),
        WorkEntry::new("02/03/2025", 1, "Programacion"),
        WorkEntry::new("02/03/2025", 2, "Prototipo"),
        WorkEntry::new("03/03/2025", 2, "Prototipo"),
        WorkEntry::new("05/03/2025", 2, "Prototipo"),
        WorkEntry::new("06/03/2025", 1, "Documentacion"),
        WorkEntry::new("10/03/2025", 2, "Prototipo"),
        WorkEntry::new("10/03/2025", 3, "Programacion"),
        WorkEntry::new("11/03/2025", 2, "Programacion"),
        WorkEntry::new("11/03/2025", 1, "Programacion"),
        WorkEntry::new("13/03/2025", 3, "Programacion"),
        WorkEntry::new("14/03/2025", 3, "Programacion"),
        WorkEntry::new("17/03/2025", 2, "Programacion"),
        WorkEntry::new("20/03/2025", 3, "Programacion"),
        WorkEntry::new("22/03/2025", 3, "Programacion"),
        WorkEntry::new("24/03/2025", 3, "Programacion"),
    ]
}

/// Read entries from a JSON array of `{ date, hours, task }`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid entry list.
pub fn load_entries(path: &Path) -> Result<Vec<WorkEntry>, InvoiceError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| InvoiceError::Read { path: path.display().to_string(), source })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Escape text for HTML content and quoted attributes. Same rules as the
/// dashboard's `render::html_escape`; this crate does not depend on it.
#[must_use]
pub fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Unknown placeholders are left as written.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
