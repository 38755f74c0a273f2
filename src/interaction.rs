//! Interaction tree: the structured result of consequence extraction.
//!
//! The tree is built fresh for every triggering message and only refers to
//! the catalog through type-name strings, so it can be rendered (or
//! inspected in tests) independently of extraction.

use std::fmt;

/// Participant identifiers used when the real caller or callee is unknown.
pub mod participants {
    /// The outside world triggering the root message.
    pub const EXTERNAL_ACTOR: &str = "A";
    /// A handler whose service could not be derived, or a reply leaving the system.
    pub const BOUNDARY: &str = "Q";
    /// Synthetic default source.
    pub const DEFAULT: &str = "W";

    /// Whether `id` is one of the sentinel identifiers.
    pub fn is_sentinel(id: &str) -> bool {
        id == EXTERNAL_ACTOR || id == BOUNDARY || id == DEFAULT
    }
}

/// A message sent from one participant to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrow {
    pub source: String,
    pub target: String,
    /// Short name of the message type.
    pub name: String,
    /// Color tag, e.g. `#DodgerBlue`.
    pub color: String,
}

/// Kind of branch an alternative section stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    If,
    Case,
    Switch,
    ForEach,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::If => "if",
            GroupKind::Case => "case",
            GroupKind::Switch => "switch",
            GroupKind::ForEach => "forEach",
        }
    }

    /// Name used in a `group` header; `case` and `switch` are both shown as `switch`.
    pub fn header_name(&self) -> &'static str {
        match self {
            GroupKind::Case | GroupKind::Switch => "switch",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One branch of an [`Alt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltSection {
    /// Branch condition, case labels, or loop expression.
    pub label: String,
    /// Set on the first section of a group only; `None` renders as plain `alt`/`else`.
    pub kind: Option<GroupKind>,
    pub fragments: Vec<InteractionFragment>,
}

/// A set of alternative (or iterated) branches. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alt {
    pub sections: Vec<AltSection>,
}

/// A node in the interaction tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionFragment {
    Arrow(Arrow),
    Alt(Alt),
    Interactions(Interactions),
}

/// An ordered sequence of fragments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Interactions {
    pub fragments: Vec<InteractionFragment>,
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn push(&mut self, fragment: InteractionFragment) {
        self.fragments.push(fragment);
    }

    pub fn extend(&mut self, fragments: impl IntoIterator<Item = InteractionFragment>) {
        self.fragments.extend(fragments);
    }

    /// All arrows in depth-first order, including those nested in groups.
    pub fn arrows(&self) -> Vec<&Arrow> {
        let mut out = Vec::new();
        collect_arrows(&self.fragments, &mut out);
        out
    }

    /// The first arrow in depth-first order.
    pub fn first_arrow_mut(&mut self) -> Option<&mut Arrow> {
        first_arrow_mut(&mut self.fragments)
    }
}

impl IntoIterator for Interactions {
    type Item = InteractionFragment;
    type IntoIter = std::vec::IntoIter<InteractionFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}

pub(crate) fn collect_arrows<'f>(fragments: &'f [InteractionFragment], out: &mut Vec<&'f Arrow>) {
    for fragment in fragments {
        match fragment {
            InteractionFragment::Arrow(arrow) => out.push(arrow),
            InteractionFragment::Alt(alt) => {
                for section in &alt.sections {
                    collect_arrows(&section.fragments, out);
                }
            }
            InteractionFragment::Interactions(nested) => collect_arrows(&nested.fragments, out),
        }
    }
}

fn first_arrow_mut(fragments: &mut [InteractionFragment]) -> Option<&mut Arrow> {
    for fragment in fragments {
        let found = match fragment {
            InteractionFragment::Arrow(arrow) => Some(arrow),
            InteractionFragment::Alt(alt) => alt
                .sections
                .iter_mut()
                .find_map(|section| first_arrow_mut(&mut section.fragments)),
            InteractionFragment::Interactions(nested) => first_arrow_mut(&mut nested.fragments),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}
