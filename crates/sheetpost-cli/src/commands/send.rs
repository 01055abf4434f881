use crate::commands::{print_json, Context, SourceArgs};
use crate::error::not_found;
use crate::mailer::{build_mailer, resolve_from};
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args, ValueEnum};
use sheetpost_core::{classify_contacts, dispatch, DispatchRequest, TemplateKind};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long)]
    pub subject: Option<String>,
    /// HTML body read from a file
    #[arg(long, conflicts_with = "template")]
    pub body_file: Option<PathBuf>,
    /// HTML body read from the template store
    #[arg(long)]
    pub template: Option<String>,
    #[arg(long, value_enum, default_value_t = TemplateTypeArg::Certificate)]
    pub template_type: TemplateTypeArg,
    /// Sender address; defaults to smtp.from
    #[arg(long)]
    pub from: Option<String>,
    /// Personalize and count without contacting the mail server
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TemplateTypeArg {
    Certificate,
    Plain,
}

impl From<TemplateTypeArg> for TemplateKind {
    fn from(value: TemplateTypeArg) -> Self {
        match value {
            TemplateTypeArg::Certificate => TemplateKind::Certificate,
            TemplateTypeArg::Plain => TemplateKind::Plain,
        }
    }
}

pub fn send(ctx: &Context<'_>, args: SendArgs) -> Result<()> {
    let body = read_body(ctx, &args)?;
    let from = resolve_from(ctx.config, args.from.clone());
    let request = DispatchRequest {
        from: &from,
        subject: args.subject.as_deref().unwrap_or_default(),
        body: &body,
        template: args.template_type.into(),
    };
    request.validate()?;

    let mailer = build_mailer(ctx.config, args.dry_run)?;
    let records = ctx.load_records(&args.source)?;
    let contacts = classify_contacts(&records).contacts;
    let result = dispatch(mailer.as_ref(), &contacts, &request)?;
    info!(
        sent = result.sent_count,
        failed = result.failed_count,
        dry_run = args.dry_run,
        "dispatch finished"
    );

    if ctx.json {
        return print_json(&result);
    }

    let verb = if args.dry_run { "would send" } else { "sent" };
    println!("{verb} {}, failed {}", result.sent_count, result.failed_count);
    for failure in &result.failures {
        println!("  {}: {}", failure.email, failure.error_message);
    }
    Ok(())
}

fn read_body(ctx: &Context<'_>, args: &SendArgs) -> Result<String> {
    if let Some(path) = &args.body_file {
        return fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => not_found(format!("body file {}", path.display())),
            _ => anyhow::Error::new(err).context(format!("read {}", path.display())),
        });
    }
    match &args.template {
        Some(name) => Ok(ctx
            .templates()
            .load_template(name)
            .with_context(|| format!("load template {name}"))?
            .html),
        None => Ok(String::new()),
    }
}
