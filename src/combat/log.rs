//! Textual combat event log for the first trial, keyed by elapsed
//! simulation time. Disabled unless the build asks for debug output, so the
//! hot loop pays nothing for it. Exportable as CSV for inspection.

use std::io::Write;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEventKind {
    CastStart,
    Cast,
    Damage,
    Note,
}

impl LogEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogEventKind::CastStart => "cast_start",
            LogEventKind::Cast => "cast",
            LogEventKind::Damage => "damage",
            LogEventKind::Note => "note",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub at_ms: i64,
    pub kind: LogEventKind,
    pub label: String,
    pub amount: f64,
    pub crit: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    enabled: bool,
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    fn push(&mut self, at_ms: i64, kind: LogEventKind, label: &str, amount: f64, crit: bool) {
        if !self.enabled {
            return;
        }
        self.entries.push(LogEntry {
            at_ms,
            kind,
            label: label.to_string(),
            amount,
            crit,
        });
    }

    pub fn cast_start(&mut self, name: &str, at_ms: i64) {
        self.push(at_ms, LogEventKind::CastStart, name, 0.0, false);
    }

    pub fn cast(&mut self, name: &str, at_ms: i64) {
        self.push(at_ms, LogEventKind::Cast, name, 0.0, false);
    }

    pub fn damage(&mut self, label: &str, amount: f64, crit: bool, at_ms: i64) {
        self.push(at_ms, LogEventKind::Damage, label, amount, crit);
    }

    pub fn note(&mut self, text: &str, at_ms: i64) {
        self.push(at_ms, LogEventKind::Note, text, 0.0, false);
    }

    /// Render entries as plain text lines, newest last.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry.kind {
                LogEventKind::Damage => {
                    let crit = if entry.crit { " CRIT" } else { "" };
                    out.push_str(&format!(
                        "[{}ms] {} - damage done: {}{}\n",
                        entry.at_ms, entry.label, entry.amount, crit
                    ));
                }
                kind => {
                    out.push_str(&format!(
                        "[{}ms] {}: {}\n",
                        entry.at_ms,
                        kind.as_str(),
                        entry.label
                    ));
                }
            }
        }
        out
    }

    /// Write entries as CSV: `at_ms,event,label,amount,crit`.
    pub fn export_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["at_ms", "event", "label", "amount", "crit"])?;
        for entry in &self.entries {
            csv_writer.write_record([
                entry.at_ms.to_string(),
                entry.kind.as_str().to_string(),
                entry.label.clone(),
                entry.amount.to_string(),
                entry.crit.to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_records_nothing() {
        let mut log = CombatLog::new(false);
        log.cast("Slash 1", 100);
        log.damage("Slash 1", 42.0, false, 100);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn enabled_log_keeps_order_and_detail() {
        let mut log = CombatLog::new(true);
        log.cast_start("Ice Bolt 3", 0);
        log.cast("Ice Bolt 3", 1500);
        log.damage("Ice Bolt 3", 210.0, true, 1500);
        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.entries()[2].amount, 210.0);
        assert!(log.entries()[2].crit);

        let text = log.render_text();
        assert!(text.contains("[1500ms] Ice Bolt 3 - damage done: 210 CRIT"));
    }

    #[test]
    fn csv_export_includes_header_and_rows() {
        let mut log = CombatLog::new(true);
        log.damage("Auto Attack", 55.0, false, 300);
        let mut buffer = Vec::new();
        log.export_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("at_ms,event,label,amount,crit"));
        assert_eq!(lines.next(), Some("300,damage,Auto Attack,55,false"));
    }
}
