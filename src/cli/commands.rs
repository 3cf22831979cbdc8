//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::CheckConfig;
use crate::frontend::{CheckOutcome, Declarations, load_declarations};
use crate::types::{ClassType, InterfaceType};

use super::{CliError, CliResult, ExitCode};

/// Load a declaration file, rendering load errors with miette.
fn load(path: &Path) -> CliResult<Declarations> {
    let src = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading {}: {}", path.display(), e)))?;
    load_declarations(&src).map_err(|e| {
        let report = miette::Report::new(e);
        CliError::failure(format!("Error loading {}:\n{:?}", path.display(), report))
    })
}

/// `classtype check <FILE>`
pub fn check_file(path: &Path, config: &CheckConfig) -> CliResult<ExitCode> {
    let decls = load(path)?;
    if config.show_layout {
        print!("{}", render_declarations(&decls));
        println!();
    }
    let outcomes = decls.run_checks(config);
    print!("{}", render_outcomes(&outcomes));
    if outcomes.iter().all(|o| o.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// `classtype show <FILE>`
pub fn show_file(path: &Path) -> CliResult<ExitCode> {
    let decls = load(path)?;
    print!("{}", render_declarations(&decls));
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Rendering
// ============================================================================

/// Every interface, then every class, in declaration order, separated by blank lines.
pub fn render_declarations(decls: &Declarations) -> String {
    let unit = decls.unit();
    let mut blocks: Vec<String> = unit.interfaces().iter().map(|i| render_interface(i)).collect();
    blocks.extend(unit.classes().iter().map(|c| render_layout(c)));
    blocks.join("\n")
}

pub fn render_interface(iface: &InterfaceType) -> String {
    let mut out = String::new();
    let kind = if iface.is_module() {
        "module interface"
    } else {
        "interface"
    };
    let _ = writeln!(out, "{} {}", kind, iface.python_str());
    for method in iface.methods() {
        let _ = writeln!(out, "  {}", method);
    }
    out
}

/// Slot layout of a class: attributes and constants with their slot numbers, then methods in order.
pub fn render_layout(class: &ClassType) -> String {
    let mut out = String::new();
    let kind = if class.is_module() { "module" } else { "class" };
    let _ = writeln!(out, "{} {}", kind, class.python_str());

    if class.num_attributes() > 0 {
        let _ = writeln!(out, "  attributes:");
        for (slot, (name, ty)) in class
            .attribute_names()
            .iter()
            .zip(class.attribute_types())
            .enumerate()
        {
            let mark = if class.is_parameter(slot).unwrap_or(false) {
                " (parameter)"
            } else {
                ""
            };
            let _ = writeln!(out, "    [{}] {}: {}{}", slot, name, ty, mark);
        }
    }
    if class.num_constants() > 0 {
        let _ = writeln!(out, "  constants:");
        for (slot, (name, value)) in class
            .constant_names()
            .iter()
            .zip(class.constant_values())
            .enumerate()
        {
            let _ = writeln!(out, "    [{}] {} = {}", slot, name, value);
        }
    }
    if !class.methods().is_empty() {
        let _ = writeln!(out, "  methods:");
        for method in class.methods() {
            let _ = writeln!(out, "    {}", method.schema());
        }
    }
    out
}

/// One line per check, failure reasons indented below, then a summary line.
pub fn render_outcomes(outcomes: &[CheckOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        let status = if outcome.passed { "ok  " } else { "FAIL" };
        let _ = writeln!(out, "{} {} <: {}", status, outcome.ty, outcome.expected);
        for reason in &outcome.reasons {
            for line in reason.lines() {
                let _ = writeln!(out, "     {}", line);
            }
        }
    }
    let failed = outcomes.iter().filter(|o| !o.passed).count();
    let _ = writeln!(out, "\n{} passed, {} failed", outcomes.len() - failed, failed);
    out
}
