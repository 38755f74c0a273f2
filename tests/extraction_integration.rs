//! Extraction tests against the analyzed Pitstop catalog in testdata.

use std::path::PathBuf;

use choreodoc::catalog::{Catalog, TypeCatalog};
use choreodoc::conventions::Conventions;
use choreodoc::extract::extract_interactions;
use choreodoc::interaction::{GroupKind, InteractionFragment};
use choreodoc::report;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load() -> (Catalog, Conventions) {
    let testdata = testdata_path();
    let catalog = Catalog::load(testdata.join("pitstop.analyzed.json")).expect("should load catalog");
    let conventions =
        Conventions::parse_file(testdata.join("conventions.yaml")).expect("should parse conventions");
    conventions.validate().expect("conventions should be valid");
    (catalog, conventions)
}

fn arrow_summary(catalog: &Catalog, conventions: &Conventions, message: &str) -> Vec<String> {
    let message = catalog.lookup(message).expect("message should exist");
    let extraction = extract_interactions(catalog, conventions, message).expect("extraction should succeed");
    extraction
        .interactions
        .arrows()
        .iter()
        .map(|a| format!("{} -> {} : {} {}", a.source, a.target, a.name, a.color))
        .collect()
}

#[test]
fn test_catalog_loads() {
    let (catalog, _) = load();
    assert_eq!(catalog.len(), 22);
    assert!(catalog.lookup("NotificationManager").is_some());
}

#[test]
fn test_partial_conventions_keep_defaults() {
    let (_, conventions) = load();
    assert_eq!(conventions.product_name, "pitstop");
    assert_eq!(conventions.max_depth, 8);
    assert_eq!(conventions.skin_parameters.len(), 1);
    assert_eq!(conventions.command_color, "#DodgerBlue");
    assert_eq!(conventions.publish_methods.len(), 2);
}

#[test]
fn test_register_customer_fans_out_to_event_handlers() {
    let (catalog, conventions) = load();
    assert_eq!(
        arrow_summary(&catalog, &conventions, "Pitstop.CustomerManagementAPI.Commands.RegisterCustomer"),
        vec![
            "A -> CustomerManagementAPI : RegisterCustomer #DodgerBlue",
            "CustomerManagementAPI -> Notifications : CustomerRegistered #ForestGreen",
            "CustomerManagementAPI -> InvoiceService : CustomerRegistered #ForestGreen",
        ]
    );
}

#[test]
fn test_finish_maintenance_job_nests_groups() {
    let (catalog, conventions) = load();
    let message = catalog
        .lookup("Pitstop.WorkshopManagementAPI.Commands.FinishMaintenanceJob")
        .unwrap();
    let extraction = extract_interactions(&catalog, &conventions, message).unwrap();

    assert_eq!(
        extraction.services.as_slice(),
        &["WorkshopManagementAPI", "InvoiceService", "Notifications", "Auditlog"]
    );

    let fragments = &extraction.interactions.fragments;
    assert_eq!(fragments.len(), 2);
    let InteractionFragment::Alt(if_group) = &fragments[1] else {
        panic!("expected if group, got {:?}", fragments[1]);
    };
    // The else branch only returns, so it is pruned.
    assert_eq!(if_group.sections.len(), 1);
    assert_eq!(if_group.sections[0].kind, Some(GroupKind::If));
    assert_eq!(if_group.sections[0].label, "ModelState.IsValid");

    let InteractionFragment::Alt(switch_group) = &if_group.sections[0].fragments[1] else {
        panic!("expected switch group");
    };
    assert_eq!(switch_group.sections.len(), 1);
    assert_eq!(switch_group.sections[0].kind, Some(GroupKind::Case));
    assert_eq!(switch_group.sections[0].label, "case \"repair\":");
}

#[test]
fn test_command_without_handler_is_empty() {
    let (catalog, conventions) = load();
    let message = catalog.lookup("PlanMaintenanceJob").unwrap();
    let extraction = extract_interactions(&catalog, &conventions, message).unwrap();
    assert!(!extraction.has_handler());
}

#[test]
fn test_inventory() {
    let (catalog, conventions) = load();
    let inventory = report::inventory(&catalog, &conventions);

    let commands: Vec<_> = inventory.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        commands,
        vec!["FinishMaintenanceJob", "PlanMaintenanceJob", "RegisterCustomer"]
    );
    let events: Vec<_> = inventory.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        events,
        vec!["CustomerRegistered", "InvoiceCreated", "MaintenanceJobFinished", "NotificationSent"]
    );

    let registered = &inventory.events[0];
    assert_eq!(registered.handled_by, vec!["Notifications", "InvoiceService"]);
    assert_eq!(inventory.commands[2].sent_from, vec!["WebApp"]);
    assert_eq!(inventory.unhandled_commands().count(), 1);
}
