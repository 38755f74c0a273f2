//! Builders for small synthetic catalogs used by unit tests.

use super::model::*;

pub const COMMAND: &str = "Pitstop.Infrastructure.Messaging.Command";
pub const EVENT: &str = "Pitstop.Infrastructure.Messaging.Event";
pub const CALLBACK: &str = "Pitstop.Infrastructure.Messaging.IMessageHandlerCallback";
pub const FROM_BODY: &str = "Microsoft.AspNetCore.Mvc.FromBodyAttribute";
pub const MESSAGE_PUBLISHER: &str = "Pitstop.Infrastructure.Messaging.IMessagePublisher";

pub fn class(full_name: &str) -> TypeDescription {
    TypeDescription::new(TypeKind::Class, full_name)
}

pub fn interface(full_name: &str) -> TypeDescription {
    TypeDescription::new(TypeKind::Interface, full_name)
}

pub fn command(full_name: &str) -> TypeDescription {
    class(full_name).with_base(COMMAND)
}

pub fn event(full_name: &str) -> TypeDescription {
    class(full_name).with_base(EVENT)
}

/// A controller accepting `command` from the request body in `action`.
pub fn command_handler(
    full_name: &str,
    action: &str,
    command: &str,
    body: Vec<Statement>,
) -> TypeDescription {
    class(full_name).with_method(
        MethodDescription::new(action)
            .with_parameter(ParameterDescription {
                name: "command".to_string(),
                type_name: command.to_string(),
                attributes: vec![AttributeDescription {
                    type_name: FROM_BODY.to_string(),
                }],
            })
            .with_body(body),
    )
}

/// A message handler class reacting to `event` in `HandleAsync`.
pub fn event_handler(full_name: &str, event: &str, body: Vec<Statement>) -> TypeDescription {
    class(full_name).with_base(CALLBACK).with_method(
        MethodDescription::new("HandleAsync")
            .with_parameter(ParameterDescription {
                name: "e".to_string(),
                type_name: event.to_string(),
                attributes: Vec::new(),
            })
            .with_body(body),
    )
}

/// `publisher.PublishMessageAsync(messageType, message, "")`.
pub fn publish(message: &str) -> Statement {
    Statement::Invocation(
        Invocation::new(MESSAGE_PUBLISHER, "PublishMessageAsync")
            .with_argument("string")
            .with_argument(message)
            .with_argument("string"),
    )
}

/// `RaiseEvent(e)` inside an aggregate.
pub fn raise(event: &str) -> Statement {
    Statement::Invocation(
        Invocation::new("Pitstop.Domain.Core.AggregateRoot", "RaiseEvent").with_argument(event),
    )
}

pub fn call(containing_type: &str, name: &str) -> Statement {
    Statement::Invocation(Invocation::new(containing_type, name))
}

pub fn if_else(sections: Vec<(&str, Vec<Statement>)>) -> Statement {
    Statement::If(IfStatement {
        sections: sections
            .into_iter()
            .map(|(condition, statements)| IfSection {
                condition: condition.to_string(),
                statements,
            })
            .collect(),
    })
}

pub fn switch(sections: Vec<(Vec<&str>, Vec<Statement>)>) -> Statement {
    Statement::Switch(SwitchStatement {
        expression: "command.Kind".to_string(),
        sections: sections
            .into_iter()
            .map(|(labels, statements)| SwitchSection {
                labels: labels.into_iter().map(String::from).collect(),
                statements,
            })
            .collect(),
    })
}

pub fn for_each(expression: &str, statements: Vec<Statement>) -> Statement {
    Statement::ForEach(ForEachStatement {
        expression: expression.to_string(),
        statements,
    })
}

impl TypeDescription {
    pub fn with_base(mut self, base: &str) -> Self {
        self.base_types.push(base.to_string());
        self
    }

    pub fn with_method(mut self, method: MethodDescription) -> Self {
        self.methods.push(method);
        self
    }
}

impl MethodDescription {
    pub fn with_parameter(mut self, parameter: ParameterDescription) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }
}

impl Invocation {
    pub fn with_argument(mut self, type_name: &str) -> Self {
        self.arguments.push(ArgumentDescription {
            type_name: type_name.to_string(),
            text: String::new(),
        });
        self
    }
}
