//! Remove command implementation

use std::io::Write;

use console::style;

use crate::cli::RemoveArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::operations::RemoveOperation;

pub fn run(ctx: &mut CommandContext, args: RemoveArgs, out: &mut dyn Write) -> Result<()> {
    let outcome =
        RemoveOperation::new(ctx.registry.as_mut(), ctx.project.as_ref()).execute(&args.name)?;

    writeln!(out, "{} removed", style(&outcome.record.name).green().bold())?;
    if outcome.manifest_updated {
        writeln!(out, "Updated project stub list")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fake_context;
    use crate::error::StubError;
    use crate::test_fixtures::{FakeRegistry, FakeSource, FakeTransport, create_project};
    use tempfile::TempDir;

    #[test]
    fn test_remove_updates_manifest() {
        let temp = TempDir::new().unwrap();
        let project = create_project(temp.path(), "stubs: [\"a\", \"rp2-stubs\", \"b\"]\n");
        let mut ctx = fake_context(
            temp.path(),
            Some(project),
            FakeRegistry::default().with_record("rp2-stubs", "rp2"),
            FakeSource::new(temp.path()),
            FakeTransport::default(),
        );

        let mut out = Vec::new();
        run(
            &mut ctx,
            RemoveArgs {
                name: "rp2-stubs".to_string(),
            },
            &mut out,
        )
        .unwrap();

        let entries = ctx.project.as_ref().unwrap().manifest().entries().unwrap();
        assert_eq!(entries, vec!["a", "b"]);
        assert!(ctx.registry.records().is_empty());
    }

    #[test]
    fn test_remove_unknown() {
        let temp = TempDir::new().unwrap();
        let mut ctx = fake_context(
            temp.path(),
            None,
            FakeRegistry::default(),
            FakeSource::new(temp.path()),
            FakeTransport::default(),
        );

        let result = run(
            &mut ctx,
            RemoveArgs {
                name: "ghost".to_string(),
            },
            &mut Vec::new(),
        );
        assert!(matches!(result, Err(StubError::StubNotInstalled { .. })));
    }
}
