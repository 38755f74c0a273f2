//! Naming conventions used to recognise messages, handlers and publications.
//!
//! The analyzed model carries no notion of "command" or "service"; those are
//! inferred from well-known type names. The defaults describe the Pitstop
//! code base and can be overridden with a YAML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ChoreoError, Result};

/// Top-level conventions definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Conventions {
    /// Root product namespace segment, skipped when deriving service names
    /// (compared case-insensitively).
    pub product_name: String,
    /// Further namespace segments skipped when deriving service names.
    pub skipped_segments: Vec<String>,
    /// Marker base type of every command.
    pub command_type: String,
    /// Marker base type of every event.
    pub event_type: String,
    /// Interface implemented by event handler classes.
    pub handler_callback_type: String,
    /// Attribute marking a parameter bound from the request body.
    pub body_attribute: String,
    /// Method name handling events on a callback class.
    pub event_handler_method: String,
    /// Method name handling commands outside controllers.
    pub command_handler_method: String,
    /// Invocations that publish a message.
    pub publish_methods: Vec<PublishMethod>,
    /// Arrow color for commands.
    pub command_color: String,
    /// Arrow color for events.
    pub event_color: String,
    /// Maximum chain of nested messages followed before truncating.
    pub max_depth: usize,
    /// `skinparam` lines emitted at the top of each diagram.
    pub skin_parameters: Vec<SkinParameter>,
    pub hide_footbox: bool,
}

/// An invocation convention that publishes a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublishMethod {
    /// Invoked method name (e.g. `PublishMessageAsync`).
    pub name: String,
    /// Zero-based argument position carrying the published message.
    pub argument: usize,
}

/// A diagram-wide `skinparam <name> <value>` setting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkinParameter {
    pub name: String,
    pub value: String,
}

impl SkinParameter {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            product_name: "Pitstop".to_string(),
            skipped_segments: vec!["Application".to_string()],
            command_type: "Pitstop.Infrastructure.Messaging.Command".to_string(),
            event_type: "Pitstop.Infrastructure.Messaging.Event".to_string(),
            handler_callback_type: "Pitstop.Infrastructure.Messaging.IMessageHandlerCallback"
                .to_string(),
            body_attribute: "Microsoft.AspNetCore.Mvc.FromBodyAttribute".to_string(),
            event_handler_method: "HandleAsync".to_string(),
            command_handler_method: "HandleCommandAsync".to_string(),
            publish_methods: vec![
                PublishMethod {
                    name: "PublishMessageAsync".to_string(),
                    argument: 1,
                },
                PublishMethod {
                    name: "RaiseEvent".to_string(),
                    argument: 0,
                },
            ],
            command_color: "#DodgerBlue".to_string(),
            event_color: "#ForestGreen".to_string(),
            max_depth: 32,
            skin_parameters: vec![
                SkinParameter::new("SequenceMessageAlignment", "reverseDirection"),
                SkinParameter::new("SequenceGroupBodyBackgroundColor", "Transparent"),
                SkinParameter::new("SequenceBoxBackgroundColor", "#Gainsboro"),
                SkinParameter::new("SequenceArrowThickness", "2"),
                SkinParameter::new("BoxPadding", "10"),
                SkinParameter::new("ParticipantPadding", "10"),
                SkinParameter::new("LifelineStrategy", "solid"),
            ],
            hide_footbox: true,
        }
    }
}

impl Conventions {
    /// Parse conventions from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse conventions from YAML text. Missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let conventions: Conventions = serde_yaml::from_str(content)?;
        Ok(conventions)
    }

    /// Returns the publish convention matching an invoked method name.
    pub fn publish_method(&self, name: &str) -> Option<&PublishMethod> {
        self.publish_methods.iter().find(|p| p.name == name)
    }

    /// Whether a namespace segment is skipped when deriving a service name.
    pub fn is_skipped_segment(&self, segment: &str) -> bool {
        segment.eq_ignore_ascii_case(&self.product_name)
            || self.skipped_segments.iter().any(|s| s == segment)
    }

    /// Validate the conventions.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("command_type", &self.command_type),
            ("event_type", &self.event_type),
            ("handler_callback_type", &self.handler_callback_type),
            ("body_attribute", &self.body_attribute),
            ("event_handler_method", &self.event_handler_method),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ChoreoError::InvalidConventions(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }

        if let Some(p) = self.publish_methods.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ChoreoError::InvalidConventions(format!(
                "publish method at argument {} has an empty name",
                p.argument
            )));
        }

        if self.max_depth == 0 {
            return Err(ChoreoError::InvalidConventions(
                "max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
