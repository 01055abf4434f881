use crate::commands::{print_json, resolve_sheet, Context, SourceArgs};
use anyhow::{Context as _, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct SheetsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn show_sheets(ctx: &Context<'_>, args: SheetsArgs) -> Result<()> {
    let source = ctx.source(&args.source)?;
    let id = resolve_sheet(ctx.config, args.source.sheet.clone())?;
    let metadata = source
        .fetch_metadata(&id)
        .with_context(|| format!("read metadata for {id}"))?;

    if ctx.json {
        return print_json(&metadata);
    }

    println!("{}", metadata.title);
    for sheet in &metadata.sheets {
        println!("  {sheet}");
    }
    Ok(())
}
