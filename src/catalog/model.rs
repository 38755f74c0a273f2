//! Data structures describing an analyzed code base.
//!
//! These mirror the JSON produced by the external analyzer: a flat list of
//! types, each carrying its members and the statement trees of its method
//! bodies. Everything here is read-only once loaded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
}

impl TypeKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A type found by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescription {
    /// Fully qualified, dot separated name (e.g. `Pitstop.Notifications.NotificationManager`).
    pub full_name: String,
    #[serde(default, rename = "type")]
    pub kind: TypeKind,
    /// Declared base types and implemented interfaces, possibly generic.
    #[serde(default)]
    pub base_types: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
}

impl TypeDescription {
    pub fn new(kind: TypeKind, full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Short name: the last segment of the full name, without generic arguments.
    pub fn name(&self) -> &str {
        let without_generics = strip_generics(&self.full_name);
        without_generics
            .rsplit('.')
            .next()
            .unwrap_or(without_generics)
    }

    /// Namespace: everything before the short name.
    pub fn namespace(&self) -> &str {
        let without_generics = strip_generics(&self.full_name);
        match without_generics.rfind('.') {
            Some(idx) => &without_generics[..idx],
            None => "",
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// Strip generic arguments from a type name (`AggregateRoot<Id>` -> `AggregateRoot`).
pub fn strip_generics(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// A field on a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A property on a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A method with its body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescription {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    /// Top-level statements of the body.
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl MethodDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether any parameter's type name ends with `.{short_name}`.
    pub fn has_parameter_named(&self, short_name: &str) -> bool {
        let suffix = format!(".{}", short_name);
        self.parameters.iter().any(|p| p.type_name.ends_with(&suffix))
    }
}

/// A method parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescription {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDescription>,
}

impl ParameterDescription {
    pub fn has_attribute(&self, attribute_type: &str) -> bool {
        self.attributes.iter().any(|a| a.type_name == attribute_type)
    }
}

/// An attribute attached to a parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescription {
    #[serde(rename = "type")]
    pub type_name: String,
}

/// An argument passed to an invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDescription {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Source text of the argument expression.
    #[serde(default)]
    pub text: String,
}

/// A single statement in a method body.
///
/// Only the shapes that matter for choreography are modelled; anything else
/// the analyzer emits is kept as [`Statement::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Invocation(Invocation),
    If(IfStatement),
    Switch(SwitchStatement),
    ForEach(ForEachStatement),
    Block(Block),
    #[serde(other)]
    Other,
}

impl Statement {
    /// Statements directly nested in this one, in source order.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Statement> + '_> {
        match self {
            Statement::If(s) => Box::new(s.sections.iter().flat_map(|sec| sec.statements.iter())),
            Statement::Switch(s) => {
                Box::new(s.sections.iter().flat_map(|sec| sec.statements.iter()))
            }
            Statement::ForEach(s) => Box::new(s.statements.iter()),
            Statement::Block(s) => Box::new(s.statements.iter()),
            Statement::Invocation(_) | Statement::Other => Box::new(std::iter::empty()),
        }
    }
}

/// A method call (including constructor calls, named after the constructed type).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Full name of the type declaring the invoked method.
    pub containing_type: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentDescription>,
}

impl Invocation {
    pub fn new(containing_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            containing_type: containing_type.into(),
            name: name.into(),
            arguments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    #[serde(default)]
    pub sections: Vec<IfSection>,
}

/// One `if` / `else if` / `else` branch. `else` has an empty condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IfSection {
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub sections: Vec<SwitchSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchSection {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForEachStatement {
    /// Source text of the loop header (e.g. `var item in items`).
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_namespace() {
        let t = TypeDescription::new(TypeKind::Class, "Pitstop.Notifications.NotificationManager");
        assert_eq!(t.name(), "NotificationManager");
        assert_eq!(t.namespace(), "Pitstop.Notifications");

        let generic = TypeDescription::new(TypeKind::Class, "Pitstop.Core.AggregateRoot<Pitstop.Core.Id>");
        assert_eq!(generic.name(), "AggregateRoot");
        assert_eq!(generic.namespace(), "Pitstop.Core");

        let bare = TypeDescription::new(TypeKind::Class, "Program");
        assert_eq!(bare.name(), "Program");
        assert_eq!(bare.namespace(), "");
    }

    #[test]
    fn test_statement_deserialization() {
        let json = r#"[
            {"kind": "invocation", "containingType": "A.B", "name": "Run", "arguments": [{"type": "A.C"}]},
            {"kind": "if", "sections": [{"condition": "x > 1", "statements": [{"kind": "block"}]}]},
            {"kind": "forEach", "expression": "var i in items", "statements": []},
            {"kind": "return", "expression": "null"}
        ]"#;
        let statements: Vec<Statement> = serde_json::from_str(json).unwrap();

        assert_eq!(statements.len(), 4);
        match &statements[0] {
            Statement::Invocation(inv) => {
                assert_eq!(inv.containing_type, "A.B");
                assert_eq!(inv.arguments[0].type_name, "A.C");
            }
            other => panic!("expected invocation, got {:?}", other),
        }
        assert!(matches!(statements[1], Statement::If(_)));
        assert!(matches!(statements[2], Statement::ForEach(_)));
        assert_eq!(statements[3], Statement::Other);
    }

    #[test]
    fn test_children_iterates_all_sections() {
        let stmt = Statement::If(IfStatement {
            sections: vec![
                IfSection {
                    condition: "a".into(),
                    statements: vec![Statement::Other],
                },
                IfSection {
                    condition: String::new(),
                    statements: vec![Statement::Other, Statement::Other],
                },
            ],
        });
        assert_eq!(stmt.children().count(), 3);
    }
}
