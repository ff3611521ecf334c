//! Minimal markdown document builder.

use std::fmt::Write;

use chrono::{DateTime, Utc};

/// Accumulates one markdown document. Blocks are separated by a blank line.
#[derive(Debug, Default)]
pub struct Markdown {
    out: String,
}

impl Markdown {
    pub fn new(title: &str) -> Self {
        let mut doc = Self::default();
        doc.heading(1, title);
        doc
    }

    fn block(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    pub fn heading(&mut self, level: usize, text: &str) -> &mut Self {
        self.block();
        let _ = writeln!(self.out, "{} {text}", "#".repeat(level.clamp(1, 6)));
        self
    }

    pub fn generated(&mut self, at: DateTime<Utc>) -> &mut Self {
        self.paragraph(&format!("_Generated {}_", at.format("%Y-%m-%d %H:%M UTC")))
    }

    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.block();
        let _ = writeln!(self.out, "{text}");
        self
    }

    /// A bullet list of `- **key**: value` lines.
    pub fn facts<K: AsRef<str>, V: AsRef<str>>(&mut self, facts: &[(K, V)]) -> &mut Self {
        if facts.is_empty() {
            return self;
        }
        self.block();
        for (key, value) in facts {
            let _ = writeln!(self.out, "- **{}**: {}", key.as_ref(), value.as_ref());
        }
        self
    }

    /// A pipe table. Rows shorter than the header are padded with blanks.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> &mut Self {
        self.block();
        let _ = writeln!(self.out, "| {} |", headers.join(" | "));
        let rule: Vec<&str> = headers.iter().map(|_| "---").collect();
        let _ = writeln!(self.out, "| {} |", rule.join(" | "));
        for row in rows {
            let cells: Vec<String> = (0..headers.len())
                .map(|idx| row.get(idx).map_or_else(String::new, |cell| escape_cell(cell)))
                .collect();
            let _ = writeln!(self.out, "| {} |", cells.join(" | "));
        }
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Fixed two-decimal formatting, `-` when absent.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.2}"))
}

pub fn fmt_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
