//! Activation-aware rendering of interaction trees.
//!
//! Walks the tree once, in order, writing arrows, `activate`/`deactivate`
//! markers and group blocks. Each scope (the root, every alt section, every
//! nested sequence) receives a copy of the lifelines already active in its
//! parent; sibling sections never see each other's activations.
//!
//! Within a scope:
//! - a target lifeline opens on the first direct arrow reaching it, unless
//!   it is active already, a sentinel, a self-call, or was reached by an
//!   arrow in an enclosing scope before this one began;
//! - a source lifeline opened in this scope closes after the last arrow
//!   leaving it anywhere in the scope (nested groups included);
//! - whatever is still open when the scope ends is closed there, once.
//!
//! Arrows never close a lifeline they did not open in their own scope. In
//! particular a caller substituted for the external actor is drawn without
//! a `deactivate`, since nothing activated it. Every `activate` therefore
//! has exactly one matching `deactivate`.

mod markup;

pub use markup::Markup;

use crate::interaction::participants::{is_sentinel, BOUNDARY, EXTERNAL_ACTOR};
use crate::interaction::{collect_arrows, Alt, Arrow, InteractionFragment, Interactions};

/// Render a tree of interactions to markup.
pub fn render_tree(tree: &Interactions) -> Markup {
    let mut out = Markup::new();
    render_into(&mut out, tree);
    out
}

/// Render a tree of interactions, appending to `out`.
pub fn render_into(out: &mut Markup, tree: &Interactions) {
    render_scope(out, &tree.fragments, &[], &[]);
}

/// Render one scope.
///
/// `inherited` are the lifelines active when the scope starts; `reached` the
/// targets of arrows preceding this scope in its ancestors.
fn render_scope<'t>(
    out: &mut Markup,
    scope: &'t [InteractionFragment],
    inherited: &[&'t str],
    reached: &[&'t str],
) {
    let mut opened: Vec<&'t str> = Vec::new();

    for (index, fragment) in scope.iter().enumerate() {
        match fragment {
            InteractionFragment::Arrow(arrow) => {
                render_arrow(out, arrow, scope, inherited, reached, &mut opened);
            }
            InteractionFragment::Alt(alt) => {
                let active = concat(inherited, &opened);
                let reached = concat(reached, &direct_targets(&scope[..index]));
                render_group(out, alt, &active, &reached);
            }
            InteractionFragment::Interactions(nested) => {
                let active = concat(inherited, &opened);
                let reached = concat(reached, &direct_targets(&scope[..index]));
                render_scope(out, &nested.fragments, &active, &reached);
            }
        }
    }

    for id in opened {
        out.deactivate(id);
    }
}

fn render_arrow<'t>(
    out: &mut Markup,
    arrow: &'t Arrow,
    scope: &'t [InteractionFragment],
    inherited: &[&'t str],
    reached: &[&'t str],
    opened: &mut Vec<&'t str>,
) {
    let source = arrow.source.as_str();
    let nominal_target = arrow.target.as_str();
    // Replies to the outside world end at the system boundary.
    let target = if source != EXTERNAL_ACTOR && nominal_target == EXTERNAL_ACTOR {
        BOUNDARY
    } else {
        nominal_target
    };

    out.arrow(source, &arrow.color, target, &arrow.name);

    if source == nominal_target {
        return;
    }

    if !inherited.contains(&source)
        && !is_sentinel(source)
        && opened.contains(&source)
        && is_last_from(arrow, scope)
    {
        out.deactivate(source);
        opened.retain(|id| *id != source);
    }

    if !inherited.contains(&target)
        && !is_sentinel(target)
        && is_first_to(arrow, scope)
        && !reached.contains(&target)
    {
        out.activate(target);
        opened.push(target);
    }
}

/// Render the sections of an alternative group. Sections contributing no
/// markup are left out; the group is omitted entirely when none contribute.
fn render_group<'t>(out: &mut Markup, alt: &'t Alt, active: &[&'t str], reached: &[&'t str]) {
    let mut group = Markup::new();

    for section in &alt.sections {
        let mut body = Markup::new();
        render_scope(&mut body, &section.fragments, active, reached);
        if body.is_empty() {
            continue;
        }

        if group.is_empty() {
            match section.kind {
                Some(kind) => group.group_start(kind, &section.label),
                None => group.alt_start(&section.label),
            }
        } else {
            group.else_start(&section.label);
        }
        group.append(&body);
    }

    if !group.is_empty() {
        out.append(&group);
        out.group_end();
    }
}

/// Whether `arrow` is the last arrow leaving its source anywhere in `scope`.
fn is_last_from(arrow: &Arrow, scope: &[InteractionFragment]) -> bool {
    let mut arrows = Vec::new();
    collect_arrows(scope, &mut arrows);
    arrows
        .into_iter()
        .rev()
        .find(|a| a.source == arrow.source)
        .map_or(false, |last| std::ptr::eq(last, arrow))
}

/// Whether `arrow` is the first direct arrow of `scope` reaching its target.
fn is_first_to(arrow: &Arrow, scope: &[InteractionFragment]) -> bool {
    scope
        .iter()
        .filter_map(|f| match f {
            InteractionFragment::Arrow(a) => Some(a),
            _ => None,
        })
        .find(|a| a.target == arrow.target)
        .map_or(false, |first| std::ptr::eq(first, arrow))
}

fn direct_targets(fragments: &[InteractionFragment]) -> Vec<&str> {
    fragments
        .iter()
        .filter_map(|f| match f {
            InteractionFragment::Arrow(a) => Some(a.target.as_str()),
            _ => None,
        })
        .collect()
}

fn concat<'t>(left: &[&'t str], right: &[&'t str]) -> Vec<&'t str> {
    left.iter().chain(right.iter()).copied().collect()
}
