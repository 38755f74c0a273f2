//! Choreodoc - sequence diagrams from message-driven code.
//!
//! Choreodoc reads a catalog of analyzed types (classes, interfaces, their
//! methods and simplified statement trees), finds the handlers reacting to a
//! command, follows what those handlers publish, and renders the resulting
//! choreography as a PlantUML sequence diagram with balanced lifeline
//! activations.
//!
//! # Architecture
//!
//! - `catalog`: Analyzed type model and lookup
//! - `conventions`: YAML-configurable naming conventions
//! - `classify`: Command/event classification and service names
//! - `handlers`: Handler and handling-method resolution
//! - `extract`: Consequence extraction into an interaction tree
//! - `interaction`: The interaction tree itself
//! - `render`: Activation-aware markup rendering
//! - `diagram`: Complete diagram documents, batch rendering
//! - `report`: Message inventory output (text, JSON)

pub mod catalog;
pub mod classify;
pub mod cli;
pub mod conventions;
pub mod diagram;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod interaction;
pub mod render;
pub mod report;

pub use catalog::{Catalog, Statement, TypeCatalog, TypeDescription};
pub use classify::{Classifier, MessageKind};
pub use conventions::Conventions;
pub use diagram::{render_all, render_command_diagram, CommandDiagram, MessageDiagram};
pub use error::{ChoreoError, Result};
pub use extract::{extract_interactions, ConsequenceExtractor, Extraction, ServiceAccumulator};
pub use interaction::{Alt, AltSection, Arrow, GroupKind, InteractionFragment, Interactions};
pub use render::{render_tree, Markup};
pub use report::Inventory;
