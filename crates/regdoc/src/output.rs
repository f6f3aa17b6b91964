//! Terminal reporting for `build` and `inspect` runs.
//!
//! Everything goes to stderr so `inspect` can keep stdout for JSON.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};
use regdoc_site::{BuildFailure, BuildReport};
use regdoc_stardoc::DocumentCollection;

pub(crate) struct Output {
    term: Term,
    label: Style,
    done: Style,
    failed: Style,
    fatal: Style,
    count: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            done: Style::new().green(),
            failed: Style::new().yellow(),
            fatal: Style::new().red(),
            count: Style::new().cyan().bold(),
        }
    }

    /// Print one resolved input, e.g. `Registry: /path`.
    pub(crate) fn setting(&self, label: &str, value: &dyn Display) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// Print every failed module or version, then the totals if nothing failed.
    pub(crate) fn build_report(&self, report: &BuildReport, output_dir: &Path) {
        for failure in &report.failures {
            let _ = self
                .term
                .write_line(&self.failed.apply_to(failure_line(failure)).to_string());
        }
        if report.failures.is_empty() {
            let _ = self
                .term
                .write_line(&self.done.apply_to(summary_line(report, output_dir)).to_string());
        }
    }

    /// Print the entity counts of a decoded archive.
    pub(crate) fn archive_summary(&self, collection: &DocumentCollection) {
        let _ = self
            .term
            .write_line(&self.count.apply_to(collection_line(collection)).to_string());
    }

    /// Print the error that ended the run.
    pub(crate) fn error(&self, err: &dyn Display) {
        let _ = self
            .term
            .write_line(&self.fatal.apply_to(format!("Error: {err}")).to_string());
    }
}

/// `module@version: error`, or `module: error` for module-level failures.
fn failure_line(failure: &BuildFailure) -> String {
    match &failure.version {
        Some(version) => format!("{}@{version}: {}", failure.module, failure.error),
        None => format!("{}: {}", failure.module, failure.error),
    }
}

fn summary_line(report: &BuildReport, output_dir: &Path) -> String {
    let empty = report
        .modules
        .iter()
        .flat_map(|m| &m.versions)
        .filter(|v| v.documents == 0)
        .count();
    let mut line = format!(
        "Built {} pages for {} modules to {}",
        report.page_count(),
        report.modules.len(),
        output_dir.display()
    );
    if empty > 0 {
        line.push_str(&format!(" ({empty} without API docs)"));
    }
    line
}

fn collection_line(collection: &DocumentCollection) -> String {
    let (mut rules, mut providers, mut functions, mut aspects) = (0, 0, 0, 0);
    for doc in collection {
        rules += doc.rules.len();
        providers += doc.providers.len();
        functions += doc.functions.len();
        aspects += doc.aspects.len();
    }
    format!(
        "{} documents: {rules} rules, {providers} providers, {functions} functions, {aspects} aspects",
        collection.len()
    )
}
