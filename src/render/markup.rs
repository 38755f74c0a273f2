//! Line-oriented sequence diagram markup (PlantUML dialect).

use std::fmt;

use crate::interaction::GroupKind;

/// Accumulates diagram markup, one statement per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    text: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Append a raw line.
    pub fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Append markup rendered elsewhere.
    pub fn append(&mut self, other: &Markup) {
        self.text.push_str(&other.text);
    }

    pub fn start(&mut self) {
        self.line("@startuml");
    }

    pub fn end(&mut self) {
        self.line("@enduml");
    }

    pub fn skin_parameter(&mut self, name: &str, value: &str) {
        self.line(&format!("skinparam {} {}", name, value));
    }

    pub fn participant(&mut self, id: &str) {
        self.line(&format!("participant {}", id));
    }

    /// `source -[color]> target : label`
    pub fn arrow(&mut self, source: &str, color: &str, target: &str, label: &str) {
        self.line(&format!("{} -[{}]> {} : {}", source, color, target, label));
    }

    pub fn activate(&mut self, id: &str) {
        self.line(&format!("activate {}", id));
    }

    pub fn deactivate(&mut self, id: &str) {
        self.line(&format!("deactivate {}", id));
    }

    /// Plain `alt` header.
    pub fn alt_start(&mut self, label: &str) {
        self.line(&with_label("alt", label));
    }

    /// `group <kind> [label]` header. Switch groups open with an `else` line
    /// carrying the first case label.
    pub fn group_start(&mut self, kind: GroupKind, label: &str) {
        let header = format!("group {}", kind.header_name());
        match kind {
            GroupKind::Case | GroupKind::Switch => {
                self.line(&header);
                self.else_start(label);
            }
            GroupKind::If | GroupKind::ForEach => {
                if label.is_empty() {
                    self.line(&header);
                } else {
                    self.line(&format!("{} [{}]", header, label));
                }
            }
        }
    }

    pub fn else_start(&mut self, label: &str) {
        self.line(&with_label("else", label));
    }

    pub fn group_end(&mut self) {
        self.line("end");
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn with_label(keyword: &str, label: &str) -> String {
    if label.trim().is_empty() {
        keyword.to_string()
    } else {
        format!("{} {}", keyword, label)
    }
}
