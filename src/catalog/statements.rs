//! Statement tree helpers: flattening and following invocations.

use super::{Invocation, MethodDescription, Statement, TypeCatalog, TypeDescription};
use crate::error::{ChoreoError, Result};

/// Returns every invocation in `statements`, in source order, descending into
/// if/switch/foreach sections and blocks.
pub fn flatten_invocations(statements: &[Statement]) -> Vec<&Statement> {
    let mut out = Vec::new();
    for statement in statements {
        collect_invocations(statement, &mut out);
    }
    out
}

fn collect_invocations<'s>(statement: &'s Statement, out: &mut Vec<&'s Statement>) {
    match statement {
        Statement::Invocation(_) => out.push(statement),
        Statement::Other => {}
        _ => {
            for child in statement.children() {
                collect_invocations(child, out);
            }
        }
    }
}

/// Resolve the type whose method body runs for `invocation`.
///
/// Calls through an interface are attributed to the first catalog type
/// implementing it. Returns `Ok(None)` for types outside the catalog
/// (framework and library calls), and an error when an interface has no
/// implementation at all.
pub fn resolve_invocation_target<'c>(
    catalog: &'c dyn TypeCatalog,
    invocation: &Invocation,
) -> Result<Option<&'c TypeDescription>> {
    let Some(declared) = catalog.lookup(&invocation.containing_type) else {
        return Ok(None);
    };

    if !declared.is_interface() {
        return Ok(Some(declared));
    }

    match catalog.implementations_of(&declared.full_name).first() {
        Some(implementation) => {
            log::debug!(
                "Resolved {}.{} to implementation {}",
                declared.full_name,
                invocation.name,
                implementation.full_name
            );
            Ok(Some(*implementation))
        }
        None => Err(ChoreoError::NoImplementation {
            interface: declared.full_name.clone(),
        }),
    }
}

/// Methods on `target` that `invocation` may run. Overloads with a matching
/// arity are preferred; otherwise every method with the invoked name is used.
pub fn invoked_methods<'c>(
    target: &'c TypeDescription,
    invocation: &Invocation,
) -> Vec<&'c MethodDescription> {
    let named: Vec<&MethodDescription> = target
        .methods
        .iter()
        .filter(|m| m.name == invocation.name)
        .collect();

    let same_arity: Vec<&MethodDescription> = named
        .iter()
        .copied()
        .filter(|m| m.parameters.len() == invocation.arguments.len())
        .collect();

    if same_arity.is_empty() {
        named
    } else {
        same_arity
    }
}

/// The methods `invocation` runs, each with the type declaring it. Empty for
/// calls leaving the catalog.
pub fn invocation_targets<'c>(
    catalog: &'c dyn TypeCatalog,
    invocation: &Invocation,
) -> Result<Vec<(&'c TypeDescription, &'c MethodDescription)>> {
    let Some(target) = resolve_invocation_target(catalog, invocation)? else {
        return Ok(Vec::new());
    };
    Ok(invoked_methods(target, invocation)
        .into_iter()
        .map(|method| (target, method))
        .collect())
}

/// Identity of a method on `declaring`, distinguishing overloads.
pub fn method_key(declaring: &TypeDescription, method: &MethodDescription) -> String {
    let parameters: Vec<&str> = method
        .parameters
        .iter()
        .map(|p| p.type_name.as_str())
        .collect();
    format!(
        "{}.{}({})",
        declaring.full_name,
        method.name,
        parameters.join(", ")
    )
}

/// The flattened invocations of `method`, excluding the call site `invocation`.
pub fn method_consequences<'c>(
    method: &'c MethodDescription,
    invocation: &Statement,
) -> Vec<&'c Statement> {
    flatten_invocations(&method.statements)
        .into_iter()
        .filter(|s| !std::ptr::eq(*s, invocation))
        .collect()
}

/// The flattened invocations performed by the method(s) `invocation` calls,
/// excluding `invocation` itself.
pub fn consequence_statements<'c>(
    catalog: &'c dyn TypeCatalog,
    invocation: &Statement,
) -> Result<Vec<&'c Statement>> {
    let Statement::Invocation(call) = invocation else {
        return Ok(Vec::new());
    };

    Ok(invocation_targets(catalog, call)?
        .into_iter()
        .flat_map(|(_, method)| method_consequences(method, invocation))
        .collect())
}
