//! Consequence extraction.
//!
//! Starting from a triggering message, finds every handler reacting to it,
//! walks the handler bodies (following plain method calls into their
//! targets), and recurses into each message published along the way. The
//! result is an [`Interactions`] tree in discovery order.
//!
//! Message flows may be cyclic (A's handler publishes B, B's handler
//! publishes A). A message already being extracted further up the current
//! path still gets its arrow, but its handlers are not walked again. The
//! same truncation applies once the path reaches `max_depth`. Plain method
//! calls are guarded per handler on the resolved method (overloads are
//! distinct methods), so mutually recursive helpers terminate while a helper
//! shared by several handlers is walked for each of them.

use crate::catalog::statements::{invocation_targets, method_consequences, method_key};
use crate::catalog::{ArgumentDescription, Statement, TypeCatalog, TypeDescription};
use crate::classify::Classifier;
use crate::conventions::Conventions;
use crate::error::{ChoreoError, Result};
use crate::handlers::{handlers_for, handling_method};
use crate::interaction::participants::{BOUNDARY, EXTERNAL_ACTOR};
use crate::interaction::{Alt, AltSection, Arrow, GroupKind, InteractionFragment, Interactions};

/// Ordered set of services taking part in a diagram, in first-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAccumulator {
    services: Vec<String>,
}

impl ServiceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `service` unless already present.
    pub fn insert(&mut self, service: &str) {
        if !self.contains(service) {
            self.services.push(service.to_string());
        }
    }

    /// Put `service` first, moving it if already present.
    pub fn insert_first(&mut self, service: &str) {
        self.services.retain(|s| s != service);
        self.services.insert(0, service.to_string());
    }

    pub fn contains(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Result of extracting one triggering message.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub interactions: Interactions,
    pub services: ServiceAccumulator,
}

impl Extraction {
    /// A root message without any handler produces no arrows at all.
    pub fn has_handler(&self) -> bool {
        !self.interactions.is_empty()
    }
}

/// Extract the interaction tree for `message`.
pub fn extract_interactions(
    catalog: &dyn TypeCatalog,
    conventions: &Conventions,
    message: &TypeDescription,
) -> Result<Extraction> {
    let mut extractor = ConsequenceExtractor::new(catalog, conventions);
    let mut services = ServiceAccumulator::new();
    let interactions =
        extractor.extract_consequences(message, &mut services, None, None, None)?;
    Ok(Extraction {
        interactions,
        services,
    })
}

/// Recursive extractor. One instance serves one triggering message.
pub struct ConsequenceExtractor<'c> {
    classifier: Classifier<'c>,
    /// Services whose handler is currently being walked.
    activations: Vec<String>,
    /// Full names of messages being extracted, outermost first.
    message_path: Vec<String>,
    /// Methods followed through plain invocations in the current handler.
    invocation_path: Vec<String>,
}

impl<'c> ConsequenceExtractor<'c> {
    pub fn new(catalog: &'c dyn TypeCatalog, conventions: &'c Conventions) -> Self {
        Self {
            classifier: Classifier::new(catalog, conventions),
            activations: Vec::new(),
            message_path: Vec::new(),
            invocation_path: Vec::new(),
        }
    }

    /// Services still on the activation stack.
    pub fn activations(&self) -> &[String] {
        &self.activations
    }

    /// Extract everything that happens when `message` is sent.
    ///
    /// `previous_service` is the sender (the external actor when `None`) and
    /// `alt_scope` the service owning the flow we are nested in. Returns an
    /// empty tree when no handler exists.
    pub fn extract_consequences(
        &mut self,
        message: &TypeDescription,
        services: &mut ServiceAccumulator,
        previous_service: Option<&str>,
        alt_scope: Option<&str>,
        arguments: Option<&[ArgumentDescription]>,
    ) -> Result<Interactions> {
        let classifier = self.classifier;
        let mut result = Interactions::new();

        let handlers = handlers_for(&classifier, message);
        if handlers.is_empty() {
            log::debug!("No handler for {}", message.full_name);
            return Ok(result);
        }

        if let Some(arguments) = arguments {
            log::debug!(
                "{} published with {} argument(s)",
                message.name(),
                arguments.len()
            );
        }

        let follow = self.enter_message(message);

        for handler in handlers {
            let target = classifier
                .service_of(handler)
                .unwrap_or(BOUNDARY)
                .to_string();
            let source = previous_service.unwrap_or(EXTERNAL_ACTOR);

            result.push(InteractionFragment::Arrow(Arrow {
                source: source.to_string(),
                target: target.clone(),
                name: message.name().to_string(),
                color: classifier.arrow_color(message).to_string(),
            }));

            if !self.activations.contains(&target) {
                self.activations.push(target.clone());
            }
            services.insert(&target);

            if follow {
                match handling_method(&classifier, handler, message) {
                    Some(method) => {
                        let scope = alt_scope.unwrap_or(&target);
                        let outer = std::mem::take(&mut self.invocation_path);
                        let walked = self.traverse_all(services, &target, &method.statements, scope);
                        self.invocation_path = outer;
                        result.fragments.extend(walked?);
                    }
                    None => log::debug!(
                        "{} has no method handling {}",
                        handler.full_name,
                        message.full_name
                    ),
                }
            }

            // Keep the lifeline open while a sibling branch of the owning flow may still use it.
            let owns_scope = alt_scope == Some(target.as_str());
            if self.activations.last() == Some(&target) && !owns_scope {
                self.activations.pop();
            }
        }

        if follow {
            self.message_path.pop();
        }

        Ok(result)
    }

    /// Push `message` on the path unless it is cyclic or too deep.
    fn enter_message(&mut self, message: &TypeDescription) -> bool {
        let max_depth = self.classifier.conventions().max_depth;
        if self.message_path.contains(&message.full_name) {
            log::warn!(
                "Cyclic message flow: {} is already handled upstream, not following it again",
                message.full_name
            );
            return false;
        }
        if self.message_path.len() >= max_depth {
            log::warn!(
                "Message chain reached depth {} at {}, truncating",
                max_depth,
                message.full_name
            );
            return false;
        }
        self.message_path.push(message.full_name.clone());
        true
    }

    /// Collect the interactions caused by a single statement of a handler
    /// owned by `service`.
    fn traverse_body(
        &mut self,
        services: &mut ServiceAccumulator,
        service: &str,
        statement: &'c Statement,
        alt_scope: &str,
    ) -> Result<Interactions> {
        let classifier = self.classifier;
        let catalog = classifier.catalog();

        match statement {
            Statement::Invocation(invocation) => {
                if let Some(publish) = classifier.conventions().publish_method(&invocation.name) {
                    let argument = invocation.arguments.get(publish.argument).ok_or_else(|| {
                        ChoreoError::MissingPublishedArgument {
                            method: invocation.name.clone(),
                            position: publish.argument,
                        }
                    })?;
                    let message = catalog.lookup(&argument.type_name).ok_or_else(|| {
                        ChoreoError::UnknownType {
                            name: argument.type_name.clone(),
                        }
                    })?;

                    return self.extract_consequences(
                        message,
                        services,
                        Some(service),
                        Some(alt_scope),
                        Some(&invocation.arguments),
                    );
                }

                let mut result = Interactions::new();
                for (declaring, method) in invocation_targets(catalog, invocation)? {
                    let key = method_key(declaring, method);
                    if self.invocation_path.contains(&key) {
                        log::debug!("Recursive call to {} not followed again", key);
                        continue;
                    }

                    self.invocation_path.push(key);
                    let walked = self.traverse_consequences(
                        services,
                        service,
                        method_consequences(method, statement),
                        alt_scope,
                    );
                    self.invocation_path.pop();
                    result.fragments.extend(walked?);
                }

                Ok(result)
            }

            Statement::ForEach(for_each) => {
                let fragments =
                    self.traverse_all(services, service, &for_each.statements, alt_scope)?;

                let mut result = Interactions::new();
                if !fragments.is_empty() {
                    result.push(InteractionFragment::Alt(Alt {
                        sections: vec![AltSection {
                            label: for_each.expression.clone(),
                            kind: Some(GroupKind::ForEach),
                            fragments,
                        }],
                    }));
                }
                Ok(result)
            }

            Statement::Switch(switch) => {
                let mut branches = Vec::with_capacity(switch.sections.len());
                for section in &switch.sections {
                    let fragments =
                        self.traverse_all(services, service, &section.statements, alt_scope)?;
                    branches.push((section.labels.concat(), fragments));
                }
                Ok(alternatives(GroupKind::Case, branches))
            }

            Statement::If(if_statement) => {
                let mut branches = Vec::with_capacity(if_statement.sections.len());
                for section in &if_statement.sections {
                    let fragments =
                        self.traverse_all(services, service, &section.statements, alt_scope)?;
                    branches.push((section.condition.clone(), fragments));
                }
                Ok(alternatives(GroupKind::If, branches))
            }

            // Blocks (using/lock/try bodies) are transparent.
            Statement::Block(block) => {
                let fragments = self.traverse_all(services, service, &block.statements, alt_scope)?;
                Ok(Interactions { fragments })
            }

            Statement::Other => Ok(Interactions::new()),
        }
    }

    fn traverse_consequences(
        &mut self,
        services: &mut ServiceAccumulator,
        service: &str,
        statements: Vec<&'c Statement>,
        alt_scope: &str,
    ) -> Result<Vec<InteractionFragment>> {
        let mut fragments = Vec::new();
        for statement in statements {
            fragments.extend(self.traverse_body(services, service, statement, alt_scope)?);
        }
        Ok(fragments)
    }

    fn traverse_all(
        &mut self,
        services: &mut ServiceAccumulator,
        service: &str,
        statements: &'c [Statement],
        alt_scope: &str,
    ) -> Result<Vec<InteractionFragment>> {
        let mut fragments = Vec::new();
        for statement in statements {
            fragments.extend(self.traverse_body(services, service, statement, alt_scope)?);
        }
        Ok(fragments)
    }
}

/// Build an [`Alt`] from branches, dropping those without interactions. Only
/// the first remaining branch carries `kind`; the rest render as `else`.
fn alternatives(kind: GroupKind, branches: Vec<(String, Vec<InteractionFragment>)>) -> Interactions {
    let mut alt = Alt::default();
    for (label, fragments) in branches {
        if fragments.is_empty() {
            continue;
        }
        let kind = if alt.sections.is_empty() {
            Some(kind)
        } else {
            None
        };
        alt.sections.push(AltSection {
            label,
            kind,
            fragments,
        });
    }

    let mut result = Interactions::new();
    if !alt.sections.is_empty() {
        result.push(InteractionFragment::Alt(alt));
    }
    result
}
