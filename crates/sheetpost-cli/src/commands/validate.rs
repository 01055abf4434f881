use crate::commands::{print_json, Context, SourceArgs};
use anyhow::Result;
use clap::{ArgAction, Args};
use sheetpost_core::{classify_validation, IssueKind};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Strip all whitespace from emails before checking them
    #[arg(long, action = ArgAction::SetTrue)]
    pub fix: bool,
}

pub fn validate(ctx: &Context<'_>, args: ValidateArgs) -> Result<()> {
    let records = ctx.load_records(&args.source)?;
    let report = classify_validation(&records, args.fix);

    if ctx.json {
        return print_json(&report);
    }

    for entry in report.entries.iter().filter(|entry| entry.has_issues) {
        let issues = entry
            .issues
            .iter()
            .map(|issue| issue_label(*issue))
            .collect::<Vec<_>>()
            .join(", ");
        let email = if args.fix && entry.cleaned_email != entry.original_email {
            format!("{:?} -> {:?}", entry.original_email, entry.cleaned_email)
        } else {
            format!("{:?}", entry.original_email)
        };
        println!("row {:>4}  {}  {}  {}", entry.row, entry.name, email, issues);
    }

    let summary = &report.summary;
    println!(
        "{} rows: {} valid, {} missing names, {} missing emails, {} invalid emails, {} formatting issues",
        summary.total_rows,
        summary.valid_contacts,
        summary.missing_names,
        summary.missing_emails,
        summary.invalid_emails,
        summary.formatting_issues
    );
    Ok(())
}

fn issue_label(issue: IssueKind) -> &'static str {
    match issue {
        IssueKind::MissingName => "missing name",
        IssueKind::MissingEmail => "missing email",
        IssueKind::InvalidEmailFormat => "invalid email",
        IssueKind::FormattingIssue => "formatting",
    }
}
