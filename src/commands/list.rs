//! List command implementation
//!
//! Prints an `Installed Stubs` title followed by one table per firmware
//! family.

use std::io::Write;

use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::ListArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::operations::{ListOperation, ListReport, ListScope};
use crate::registry::StubRecord;

#[derive(Tabled)]
struct StubRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Installed")]
    installed: String,
}

impl From<&StubRecord> for StubRow {
    fn from(record: &StubRecord) -> Self {
        Self {
            name: record.name.clone(),
            version: record.firmware_version.clone().unwrap_or_else(|| "-".to_string()),
            source: record.source.clone(),
            installed: record.installed_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn run(ctx: &CommandContext, args: ListArgs, out: &mut dyn Write) -> Result<()> {
    let project = if args.all { None } else { ctx.project.as_ref() };
    let report = ListOperation::new(ctx.registry.as_ref(), project).execute()?;
    render(&report, out)
}

fn render(report: &ListReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", style("Installed Stubs").bold())?;
    match &report.scope {
        ListScope::Project(name) => writeln!(out, "Project: {}", style(name).cyan())?,
        ListScope::Global => writeln!(out, "All projects")?,
    }

    if report.is_empty() {
        writeln!(out)?;
        writeln!(out, "No stubs installed.")?;
    }

    for (family, records) in &report.groups {
        writeln!(out)?;
        writeln!(out, "{} ({})", style(family).green().bold(), records.len())?;
        let mut table = Table::new(records.iter().map(StubRow::from));
        table.with(Style::rounded());
        writeln!(out, "{table}")?;
    }

    if !report.missing.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "{} {}",
            style("Not installed:").yellow(),
            report.missing.join(", ")
        )?;
    }
    Ok(())
}
