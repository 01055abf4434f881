use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// List stored templates
    List,
    /// Print a template's HTML
    Show(ShowTemplateArgs),
}

#[derive(Debug, Args)]
pub struct ShowTemplateArgs {
    pub name: String,
}

pub fn list_templates(ctx: &Context<'_>) -> Result<()> {
    let store = ctx.templates();
    let names = store
        .list_templates()
        .with_context(|| format!("list templates in {}", store.dir().display()))?;

    if ctx.json {
        return print_json(&names);
    }
    if names.is_empty() {
        println!("no templates");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub fn show_template(ctx: &Context<'_>, args: ShowTemplateArgs) -> Result<()> {
    let doc = ctx
        .templates()
        .load_template(&args.name)
        .with_context(|| format!("load template {}", args.name))?;

    if ctx.json {
        return print_json(&doc);
    }
    print!("{}", doc.html);
    Ok(())
}
