//! Classification of raw solver replies.

use crate::error::SolverError;
use crate::extract::{ExtractMode, InputIndex, extract_model_value};
use crate::kind::NamedSymVar;
use crate::model::Model;
use crate::objective::extract_objectives;
use crate::result::SolverResult;
use crate::sexpr::{SExpr, parse_sexpr};

/// Classify a solver reply and decode its model.
///
/// The first line is the verdict (`sat`, `unsat`, `unknown`, `timeout`,
/// compared case-sensitively after trimming). For `sat` and `unknown`, the
/// remaining lines are one `get-value` or `get-objectives` answer each.
/// Anything else, including an empty reply, is returned verbatim as
/// [`SolverResult::ProofError`].
pub fn classify<S: AsRef<str>>(
    lines: &[S],
    inputs: &[NamedSymVar],
) -> Result<SolverResult, SolverError> {
    let verdict = lines.first().map(|l| l.as_ref().trim());
    let result = match verdict {
        Some("unsat") => SolverResult::Unsat,
        Some("sat") => SolverResult::Sat(build_model(&lines[1..], inputs)?),
        Some("unknown") => SolverResult::Unknown(build_model(&lines[1..], inputs)?),
        Some("timeout") => SolverResult::Timeout,
        _ => {
            tracing::warn!(lines = lines.len(), "unrecognized solver reply");
            SolverResult::ProofError(lines.iter().map(|l| l.as_ref().to_string()).collect())
        }
    };
    tracing::debug!(verdict = verdict.unwrap_or(""), "classified solver reply");
    Ok(result)
}

fn build_model<S: AsRef<str>>(lines: &[S], inputs: &[NamedSymVar]) -> Result<Model, SolverError> {
    let index = InputIndex::new(inputs);
    let mut model = Model::new();

    for line in lines.iter().map(|l| l.as_ref()) {
        if line.trim().is_empty() {
            continue;
        }
        let tree = parse_sexpr(line).map_err(|e| SolverError::Syntax {
            line: line.to_string(),
            reason: e.to_string(),
        })?;

        if is_objectives(&tree) {
            model
                .objectives
                .extend(extract_objectives(&tree, &index, line)?);
        } else if let Some(binding) =
            extract_model_value(&tree, &index, line, ExtractMode::Strict)?
        {
            model.bindings.push(binding);
        }
    }

    Ok(model)
}

fn is_objectives(tree: &SExpr) -> bool {
    matches!(tree.as_app(), Some([head, ..]) if head.is_symbol("objectives"))
}
