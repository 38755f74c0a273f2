//! Diagram rendering tests against the analyzed Pitstop catalog in testdata.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use choreodoc::catalog::{Catalog, TypeCatalog};
use choreodoc::conventions::Conventions;
use choreodoc::diagram::{render_all, render_command_diagram, CommandDiagram};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load() -> (Catalog, Conventions) {
    let testdata = testdata_path();
    let catalog = Catalog::load(testdata.join("pitstop.analyzed.json")).expect("should load catalog");
    let conventions =
        Conventions::parse_file(testdata.join("conventions.yaml")).expect("should parse conventions");
    (catalog, conventions)
}

fn render(message: &str) -> String {
    let (catalog, conventions) = load();
    let message = catalog.lookup(message).expect("message should exist");
    render_command_diagram(&catalog, &conventions, message)
        .expect("rendering should succeed")
        .markup()
        .expect("message should have a handler")
        .to_string()
}

/// Activation markers must pair up per lifeline and never close an
/// inactive lifeline.
fn assert_balanced(markup: &str) {
    let mut active: Vec<&str> = Vec::new();
    for line in markup.lines() {
        if let Some(id) = line.strip_prefix("activate ") {
            active.push(id);
        } else if let Some(id) = line.strip_prefix("deactivate ") {
            let pos = active
                .iter()
                .rposition(|a| *a == id)
                .unwrap_or_else(|| panic!("deactivate of inactive lifeline {}", id));
            active.remove(pos);
        }
    }
    assert!(active.is_empty(), "lifelines left open: {:?}", active);
}

#[test]
fn test_register_customer_diagram() {
    let markup = render("Pitstop.CustomerManagementAPI.Commands.RegisterCustomer");
    assert_eq!(
        markup,
        "@startuml\n\
         skinparam SequenceArrowThickness 2\n\
         hide footbox\n\
         participant WebApp\n\
         participant CustomerManagementAPI\n\
         participant Notifications\n\
         participant InvoiceService\n\
         WebApp -[#DodgerBlue]> CustomerManagementAPI : RegisterCustomer\n\
         activate CustomerManagementAPI\n\
         CustomerManagementAPI -[#ForestGreen]> Notifications : CustomerRegistered\n\
         activate Notifications\n\
         CustomerManagementAPI -[#ForestGreen]> InvoiceService : CustomerRegistered\n\
         deactivate CustomerManagementAPI\n\
         activate InvoiceService\n\
         deactivate Notifications\n\
         deactivate InvoiceService\n\
         @enduml\n"
    );
    assert_balanced(&markup);
}

#[test]
fn test_finish_maintenance_job_diagram() {
    let markup = render("FinishMaintenanceJob");
    assert_eq!(
        markup,
        "@startuml\n\
         skinparam SequenceArrowThickness 2\n\
         hide footbox\n\
         participant WorkshopManagementAPI\n\
         participant InvoiceService\n\
         participant Notifications\n\
         participant Auditlog\n\
         A -[#DodgerBlue]> WorkshopManagementAPI : FinishMaintenanceJob\n\
         activate WorkshopManagementAPI\n\
         group if [ModelState.IsValid]\n\
         WorkshopManagementAPI -[#ForestGreen]> InvoiceService : MaintenanceJobFinished\n\
         activate InvoiceService\n\
         group switch\n\
         else case \"repair\":\n\
         InvoiceService -[#ForestGreen]> Notifications : InvoiceCreated\n\
         activate Notifications\n\
         group forEach [var recipient in recipients]\n\
         Notifications -[#ForestGreen]> Auditlog : NotificationSent\n\
         activate Auditlog\n\
         deactivate Auditlog\n\
         end\n\
         deactivate Notifications\n\
         end\n\
         deactivate InvoiceService\n\
         end\n\
         deactivate WorkshopManagementAPI\n\
         @enduml\n"
    );
    assert_balanced(&markup);
}

#[test]
fn test_default_conventions_emit_full_preamble() {
    let (catalog, _) = load();
    let conventions = Conventions::default();
    let message = catalog.lookup("FinishMaintenanceJob").unwrap();
    let diagram = render_command_diagram(&catalog, &conventions, message).unwrap();
    let markup = diagram.markup().unwrap();

    let skinparams = markup.lines().filter(|l| l.starts_with("skinparam ")).count();
    assert_eq!(skinparams, conventions.skin_parameters.len());
    assert!(markup.starts_with("@startuml\nskinparam SequenceMessageAlignment reverseDirection\n"));
}

#[test]
fn test_render_all() {
    let (catalog, conventions) = load();
    let diagrams = render_all(&catalog, &conventions, None).unwrap();

    let names: Vec<_> = diagrams.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        names,
        vec!["FinishMaintenanceJob", "PlanMaintenanceJob", "RegisterCustomer"]
    );
    assert_eq!(diagrams[1].diagram, CommandDiagram::NoHandler);
    for diagram in &diagrams {
        if let Some(markup) = diagram.diagram.markup() {
            assert_balanced(markup);
        }
    }
}

#[test]
fn test_render_is_deterministic() {
    let (catalog, conventions) = load();
    let first = render_all(&catalog, &conventions, Some("*Customer")).unwrap();
    let second = render_all(&catalog, &conventions, Some("*Customer")).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}
