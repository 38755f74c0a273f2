//! Message inventory output.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::collections::BTreeMap;
use std::io::Write;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{TypeCatalog, TypeDescription};
use crate::classify::{Classifier, MessageKind};
use crate::conventions::Conventions;
use crate::handlers::{handlers_for, source_commands};
use crate::interaction::participants::BOUNDARY;

/// Every command and event of a catalog, grouped by short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub version: String,
    pub types_scanned: usize,
    pub commands: Vec<MessageEntry>,
    pub events: Vec<MessageEntry>,
}

/// One message name and the services around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub name: String,
    /// Services declaring a type with this name.
    pub declared_in: Vec<String>,
    /// Services handling it.
    pub handled_by: Vec<String>,
    /// Services constructing it, commands only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sent_from: Vec<String>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.events.is_empty()
    }

    /// Commands nobody handles.
    pub fn unhandled_commands(&self) -> impl Iterator<Item = &MessageEntry> {
        self.commands.iter().filter(|c| c.handled_by.is_empty())
    }
}

/// Build the message inventory of `catalog`.
pub fn inventory(catalog: &dyn TypeCatalog, conventions: &Conventions) -> Inventory {
    let classifier = Classifier::new(catalog, conventions);

    let mut commands: BTreeMap<&str, Vec<&TypeDescription>> = BTreeMap::new();
    let mut events: BTreeMap<&str, Vec<&TypeDescription>> = BTreeMap::new();
    for ty in catalog.types() {
        match classifier.message_kind(ty) {
            Some(MessageKind::Command) => commands.entry(ty.name()).or_default().push(ty),
            Some(MessageKind::Event) => events.entry(ty.name()).or_default().push(ty),
            None => {}
        }
    }

    Inventory {
        version: env!("CARGO_PKG_VERSION").to_string(),
        types_scanned: catalog.types().len(),
        commands: commands
            .into_iter()
            .map(|(name, group)| entry(&classifier, name, &group, true))
            .collect(),
        events: events
            .into_iter()
            .map(|(name, group)| entry(&classifier, name, &group, false))
            .collect(),
    }
}

fn entry(
    classifier: &Classifier<'_>,
    name: &str,
    group: &[&TypeDescription],
    with_senders: bool,
) -> MessageEntry {
    let mut declared_in = Vec::new();
    let mut handled_by = Vec::new();
    let mut sent_from = Vec::new();

    for message in group {
        push_unique(&mut declared_in, classifier.service_of(message).unwrap_or(BOUNDARY));
        for handler in handlers_for(classifier, message) {
            push_unique(&mut handled_by, classifier.service_of(handler).unwrap_or(BOUNDARY));
        }
        if with_senders {
            for source in source_commands(classifier, message) {
                if let Some(service) = classifier.service_of(source) {
                    push_unique(&mut sent_from, service);
                }
            }
        }
    }

    MessageEntry {
        name: name.to_string(),
        declared_in,
        handled_by,
        sent_from,
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Write the inventory as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, inventory: &Inventory) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(inventory)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write the inventory in pretty (human-readable) format.
pub fn write_pretty<W: Write>(
    out: &mut W,
    catalog_path: &str,
    inventory: &Inventory,
) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} v{}", "choreodoc".cyan().bold(), inventory.version)?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Catalog: ".dimmed(), catalog_path)?;
    writeln!(out, "  {}{}", "Types:   ".dimmed(), inventory.types_scanned)?;
    writeln!(out)?;

    write_section(out, "Commands", &inventory.commands)?;
    write_section(out, "Events", &inventory.events)?;

    let unhandled = inventory.unhandled_commands().count();
    if unhandled > 0 {
        let plural = if unhandled != 1 { "s" } else { "" };
        writeln!(
            out,
            "  {}",
            format!("{} command{} without handler", unhandled, plural).yellow()
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_section<W: Write>(
    out: &mut W,
    title: &str,
    entries: &[MessageEntry],
) -> anyhow::Result<()> {
    writeln!(out, "  {} ({}):", title.bold(), entries.len())?;
    writeln!(out)?;

    for entry in entries {
        write!(out, "    {:<32}", entry.name)?;
        write!(out, "{}", entry.declared_in.join(", ").blue())?;
        if entry.handled_by.is_empty() {
            write!(out, " {}", "-> (no handler)".red())?;
        } else {
            write!(out, " -> {}", entry.handled_by.join(", ").green())?;
        }
        writeln!(out)?;

        if !entry.sent_from.is_empty() {
            writeln!(
                out,
                "            {}",
                format!("sent from {}", entry.sent_from.join(", ")).dimmed()
            )?;
        }
    }
    writeln!(out)?;
    Ok(())
}
