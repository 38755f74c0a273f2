//! Message classification.
//!
//! Decides whether a type is a command or an event and which service it
//! belongs to. Service ownership is a heuristic on namespaces: the analyzed
//! model has no deployment information, so `Pitstop.Application.Foo.Bar` and
//! `Pitstop.Foo.Bar` both resolve to `Foo`.

use std::fmt;

use crate::catalog::{TypeCatalog, TypeDescription};
use crate::conventions::Conventions;

/// Kind of message a type represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Command,
    Event,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Command => "command",
            MessageKind::Event => "event",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies types against a catalog using a set of conventions.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    catalog: &'a dyn TypeCatalog,
    conventions: &'a Conventions,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog, conventions: &'a Conventions) -> Self {
        Self {
            catalog,
            conventions,
        }
    }

    pub fn catalog(&self) -> &'a dyn TypeCatalog {
        self.catalog
    }

    pub fn conventions(&self) -> &'a Conventions {
        self.conventions
    }

    pub fn is_command(&self, ty: &TypeDescription) -> bool {
        self.catalog
            .implements_type(ty, &self.conventions.command_type)
    }

    pub fn is_event(&self, ty: &TypeDescription) -> bool {
        self.catalog.implements_type(ty, &self.conventions.event_type)
    }

    /// Command takes precedence when a type somehow implements both markers.
    pub fn message_kind(&self, ty: &TypeDescription) -> Option<MessageKind> {
        if self.is_command(ty) {
            Some(MessageKind::Command)
        } else if self.is_event(ty) {
            Some(MessageKind::Event)
        } else {
            None
        }
    }

    /// Service owning `ty`: the first namespace segment that is neither the
    /// product name nor a skipped segment.
    pub fn service_of<'t>(&self, ty: &'t TypeDescription) -> Option<&'t str> {
        service_from_full_name(&ty.full_name, self.conventions)
    }

    /// Arrow color for a message: commands and everything else (events) differ.
    pub fn arrow_color(&self, ty: &TypeDescription) -> &'a str {
        if self.is_command(ty) {
            &self.conventions.command_color
        } else {
            &self.conventions.event_color
        }
    }
}

fn service_from_full_name<'t>(full_name: &'t str, conventions: &Conventions) -> Option<&'t str> {
    full_name
        .split('.')
        .find(|segment| !conventions.is_skipped_segment(segment))
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{class, command, event, COMMAND, EVENT};
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            class(COMMAND),
            class(EVENT),
            command("Pitstop.CustomerManagementAPI.Commands.RegisterCustomer"),
            event("Pitstop.CustomerManagementAPI.Events.CustomerRegistered"),
            class("Pitstop.CustomerManagementAPI.Model.Customer"),
        ])
    }

    #[test]
    fn test_classification() {
        let catalog = catalog();
        let conventions = Conventions::default();
        let classifier = Classifier::new(&catalog, &conventions);

        let register = catalog.lookup("RegisterCustomer").unwrap();
        let registered = catalog.lookup("CustomerRegistered").unwrap();
        let customer = catalog.lookup("Customer").unwrap();

        assert!(classifier.is_command(register));
        assert!(!classifier.is_event(register));
        assert!(classifier.is_event(registered));
        assert_eq!(classifier.message_kind(customer), None);
        assert_eq!(classifier.message_kind(registered), Some(MessageKind::Event));

        // The marker itself is not a command.
        let marker = catalog.lookup(COMMAND).unwrap();
        assert!(!classifier.is_command(marker));
    }

    #[test]
    fn test_arrow_color() {
        let catalog = catalog();
        let conventions = Conventions::default();
        let classifier = Classifier::new(&catalog, &conventions);

        let register = catalog.lookup("RegisterCustomer").unwrap();
        let registered = catalog.lookup("CustomerRegistered").unwrap();
        assert_eq!(classifier.arrow_color(register), "#DodgerBlue");
        assert_eq!(classifier.arrow_color(registered), "#ForestGreen");
    }

    #[test]
    fn test_service_name_skips_product_and_application() {
        let conventions = Conventions::default();
        assert_eq!(
            service_from_full_name("Pitstop.CustomerManagementAPI.Commands.RegisterCustomer", &conventions),
            Some("CustomerManagementAPI")
        );
        assert_eq!(
            service_from_full_name("Pitstop.Application.VehicleManagement.Commands.RegisterVehicle", &conventions),
            Some("VehicleManagement")
        );
        assert_eq!(
            service_from_full_name("pitstop.Notifications.NotificationWorker", &conventions),
            Some("Notifications")
        );
        assert_eq!(
            service_from_full_name("WorkshopManagementAPI.Controllers.WorkshopPlanningController", &conventions),
            Some("WorkshopManagementAPI")
        );
    }

    #[test]
    fn test_service_name_absent_when_only_skipped_segments() {
        let conventions = Conventions::default();
        assert_eq!(service_from_full_name("Pitstop.Application", &conventions), None);
        assert_eq!(service_from_full_name("Pitstop", &conventions), None);
    }
}
