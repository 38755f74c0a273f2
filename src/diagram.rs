//! Complete sequence diagrams for commands.
//!
//! Wraps a rendered interaction tree with the diagram preamble (skin
//! parameters, participant declarations) and resolves the caller of the
//! command when the catalog shows exactly one place constructing it.

use std::collections::BTreeMap;

use globset::Glob;
use rayon::prelude::*;

use crate::catalog::{TypeCatalog, TypeDescription};
use crate::classify::Classifier;
use crate::conventions::Conventions;
use crate::error::Result;
use crate::extract::{extract_interactions, Extraction};
use crate::handlers::{command_handler_for, source_commands};
use crate::render::{render_into, Markup};

/// Outcome of rendering a diagram for one triggering message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDiagram {
    Rendered {
        /// Participants in declaration order.
        participants: Vec<String>,
        markup: String,
    },
    /// The message has no handler; there is nothing to draw.
    NoHandler,
}

impl CommandDiagram {
    pub fn markup(&self) -> Option<&str> {
        match self {
            CommandDiagram::Rendered { markup, .. } => Some(markup),
            CommandDiagram::NoHandler => None,
        }
    }
}

/// A diagram together with the message it was rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDiagram {
    pub message: String,
    pub full_name: String,
    pub diagram: CommandDiagram,
}

/// Render the sequence diagram for `message`.
pub fn render_command_diagram(
    catalog: &dyn TypeCatalog,
    conventions: &Conventions,
    message: &TypeDescription,
) -> Result<CommandDiagram> {
    let mut extraction = extract_interactions(catalog, conventions, message)?;
    if !extraction.has_handler() {
        return Ok(CommandDiagram::NoHandler);
    }

    let classifier = Classifier::new(catalog, conventions);
    attribute_caller(&classifier, message, &mut extraction);

    let mut markup = Markup::new();
    markup.start();
    for parameter in &conventions.skin_parameters {
        markup.skin_parameter(&parameter.name, &parameter.value);
    }
    if conventions.hide_footbox {
        markup.line("hide footbox");
    }
    for service in extraction.services.as_slice() {
        markup.participant(service);
    }
    render_into(&mut markup, &extraction.interactions);
    markup.end();

    Ok(CommandDiagram::Rendered {
        participants: extraction.services.as_slice().to_vec(),
        markup: markup.into_string(),
    })
}

/// When a single type constructs the command, draw the first arrow from its
/// service instead of the external actor.
fn attribute_caller(
    classifier: &Classifier<'_>,
    message: &TypeDescription,
    extraction: &mut Extraction,
) {
    let sources = source_commands(classifier, message);
    let [source] = sources.as_slice() else {
        log::debug!(
            "{} constructed in {} place(s), caller left external",
            message.name(),
            sources.len()
        );
        return;
    };

    let Some(service) = classifier.service_of(source) else {
        return;
    };

    extraction.services.insert_first(service);
    if let Some(arrow) = extraction.interactions.first_arrow_mut() {
        arrow.source = service.to_string();
    }
}

/// Render a diagram for every command whose short or full name matches
/// `pattern` (all commands when `None`), sorted by message name.
///
/// Commands sharing a short name are rendered once, using the first one
/// that has a handler. Messages are rendered in parallel.
pub fn render_all(
    catalog: &dyn TypeCatalog,
    conventions: &Conventions,
    pattern: Option<&str>,
) -> Result<Vec<MessageDiagram>> {
    let matcher = pattern
        .map(|p| Glob::new(p).map(|g| g.compile_matcher()))
        .transpose()?;
    let classifier = Classifier::new(catalog, conventions);

    let mut groups: BTreeMap<&str, Vec<&TypeDescription>> = BTreeMap::new();
    for ty in catalog.types() {
        if !classifier.is_command(ty) {
            continue;
        }
        let matches = matcher
            .as_ref()
            .map_or(true, |m| m.is_match(ty.name()) || m.is_match(&ty.full_name));
        if matches {
            groups.entry(ty.name()).or_default().push(ty);
        }
    }

    let representatives: Vec<&TypeDescription> = groups
        .into_values()
        .map(|group| {
            group
                .iter()
                .copied()
                .find(|t| command_handler_for(&classifier, t).is_some())
                .unwrap_or(group[0])
        })
        .collect();

    log::info!("Rendering {} command diagram(s)", representatives.len());

    representatives
        .par_iter()
        .map(|message| -> Result<MessageDiagram> {
            Ok(MessageDiagram {
                message: message.name().to_string(),
                full_name: message.full_name.clone(),
                diagram: render_command_diagram(catalog, conventions, message)?,
            })
        })
        .collect()
}
