//! Handler resolution.
//!
//! A command is handled by the controller action that binds it from the
//! request body. An event is handled by every callback class with a
//! conventional handler method taking it.

use crate::catalog::statements::flatten_invocations;
use crate::catalog::{MethodDescription, Statement, TypeDescription};
use crate::classify::Classifier;

/// Returns the command handler (if any) followed by all event handlers.
pub fn handlers_for<'c>(
    classifier: &Classifier<'c>,
    message: &TypeDescription,
) -> Vec<&'c TypeDescription> {
    let mut handlers = Vec::new();
    if let Some(command_handler) = command_handler_for(classifier, message) {
        handlers.push(command_handler);
    }
    handlers.extend(event_handlers_for(classifier, message));
    handlers
}

/// The first class with a method binding `message` from the request body.
pub fn command_handler_for<'c>(
    classifier: &Classifier<'c>,
    message: &TypeDescription,
) -> Option<&'c TypeDescription> {
    let body_attribute = &classifier.conventions().body_attribute;
    classifier.catalog().types().iter().find(|t| {
        t.is_class()
            && t.methods.iter().any(|m| {
                m.parameters
                    .iter()
                    .any(|p| p.type_name == message.full_name && p.has_attribute(body_attribute))
            })
    })
}

/// All callback classes with a handler method for `message`, in catalog order.
pub fn event_handlers_for<'c>(
    classifier: &Classifier<'c>,
    message: &TypeDescription,
) -> Vec<&'c TypeDescription> {
    let conventions = classifier.conventions();
    let catalog = classifier.catalog();
    catalog
        .types()
        .iter()
        .filter(|t| t.is_class() && catalog.implements_type(t, &conventions.handler_callback_type))
        .filter(|t| {
            t.methods.iter().any(|m| {
                m.name == conventions.event_handler_method && m.has_parameter_named(message.name())
            })
        })
        .collect()
}

/// The method on `handler` that handles `message`.
///
/// `None` when the handler has no matching method or `message` is neither
/// a command nor an event.
pub fn handling_method<'h>(
    classifier: &Classifier<'_>,
    handler: &'h TypeDescription,
    message: &TypeDescription,
) -> Option<&'h MethodDescription> {
    let conventions = classifier.conventions();

    if classifier.is_event(message) {
        return handler.methods.iter().find(|m| {
            m.name == conventions.event_handler_method && m.has_parameter_named(message.name())
        });
    }

    if classifier.is_command(message) {
        return handler.methods.iter().find(|m| {
            let bound_from_body = m.parameters.iter().any(|p| {
                p.type_name == message.full_name && p.has_attribute(&conventions.body_attribute)
            });
            let conventional = m.name == conventions.command_handler_method
                && m.has_parameter_named(message.name());
            bound_from_body || conventional
        });
    }

    None
}

/// Types constructed as `message` somewhere in the catalog: invocations named
/// after the message on a type whose name ends with it. Distinct, in
/// discovery order.
pub fn source_commands<'c>(
    classifier: &Classifier<'c>,
    message: &TypeDescription,
) -> Vec<&'c TypeDescription> {
    let catalog = classifier.catalog();
    let name = message.name();
    let mut sources: Vec<&'c TypeDescription> = Vec::new();

    let constructions = catalog
        .types()
        .iter()
        .flat_map(|t| t.methods.iter())
        .flat_map(|m| flatten_invocations(&m.statements));

    for statement in constructions {
        let Statement::Invocation(invocation) = statement else {
            continue;
        };
        if invocation.name != name || !invocation.containing_type.ends_with(name) {
            continue;
        }
        match catalog.lookup_exact(&invocation.containing_type) {
            Some(constructed) => {
                if !sources.iter().any(|s| s.full_name == constructed.full_name) {
                    sources.push(constructed);
                }
            }
            None => log::debug!(
                "Construction of unknown type {} ignored",
                invocation.containing_type
            ),
        }
    }

    sources
}
