//! Writer for the CPLEX LP file format understood by CBC and most other MIP solvers.

use std::fmt::Write;

use crate::math::integer_linear::IntegerLinearProgram;

/// Renders `problem` as an LP file.
///
/// Names are sanitized with [`lp_name`]; solution readers must apply the same
/// mapping to find variables again.
pub fn write_lp(problem: &IntegerLinearProgram) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\* {} *\\", problem.name);
    out.push_str("Maximize\n");
    let _ = writeln!(out, "OBJ: {}", expression(&problem.objective, &problem.variables));

    out.push_str("Subject To\n");
    for ((label, row), bound) in problem
        .constraint_labels
        .iter()
        .zip(&problem.constraints)
        .zip(&problem.bounds)
    {
        let _ = writeln!(
            out,
            "{}: {} <= {}",
            lp_name(label),
            expression(row, &problem.variables),
            bound
        );
    }

    out.push_str("Bounds\n");
    for name in &problem.variables {
        let _ = writeln!(out, "{} >= 0", lp_name(name));
    }

    if !problem.integer_vars.is_empty() {
        out.push_str("Generals\n");
        for &i in &problem.integer_vars {
            let _ = writeln!(out, "{}", lp_name(&problem.variables[i]));
        }
    }
    out.push_str("End\n");
    out
}

/// Replaces characters the LP format does not allow in identifiers.
pub fn lp_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        sanitized.insert(0, '_');
    }
    sanitized
}

fn expression(coefficients: &[f64], variables: &[String]) -> String {
    let mut out = String::new();
    for (&c, name) in coefficients.iter().zip(variables) {
        if c == 0.0 {
            continue;
        }
        let name = lp_name(name);
        let magnitude = c.abs();
        if out.is_empty() {
            if c < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(if c < 0.0 { " - " } else { " + " });
        }
        if magnitude == 1.0 {
            out.push_str(&name);
        } else {
            let _ = write!(out, "{} {}", magnitude, name);
        }
    }
    if out.is_empty() {
        // LP files need at least one term on every row.
        let first = variables.first().map(|v| lp_name(v)).unwrap_or_else(|| "x".into());
        out = format!("0 {}", first);
    }
    out
}
