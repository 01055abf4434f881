use crate::commands::{print_json, Context, SourceArgs};
use anyhow::Result;
use clap::Args;
use sheetpost_core::{classify_contacts, extract_emails};

#[derive(Debug, Args)]
pub struct ContactsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct EmailsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn list_contacts(ctx: &Context<'_>, args: ContactsArgs) -> Result<()> {
    let records = ctx.load_records(&args.source)?;
    let list = classify_contacts(&records);

    if ctx.json {
        return print_json(&list);
    }

    if list.contacts.is_empty() {
        println!("no contacts");
        return Ok(());
    }

    for contact in &list.contacts {
        let name = if contact.has_name() {
            contact.name.as_str()
        } else {
            "-"
        };
        let email = if contact.has_email() {
            contact.email.as_str()
        } else {
            "-"
        };
        let flag = if contact.is_valid_email { "" } else { "  [invalid]" };
        let cert = if contact.certificate_link.is_some() {
            "  [cert]"
        } else {
            ""
        };
        println!(
            "{:>4}  {}  <{}>  row {}{}{}",
            contact.ordinal, name, email, contact.original_row_number, flag, cert
        );
    }

    let summary = &list.summary;
    println!(
        "{} contacts, {} valid emails, {} invalid, {} with name and valid email",
        summary.total,
        summary.valid_email_count,
        summary.invalid_email_count,
        summary.contacts_with_both
    );
    Ok(())
}

pub fn list_emails(ctx: &Context<'_>, args: EmailsArgs) -> Result<()> {
    let records = ctx.load_records(&args.source)?;
    let list = extract_emails(&records);

    if ctx.json {
        return print_json(&list);
    }

    for email in &list.emails {
        println!("{email}");
    }
    let summary = &list.summary;
    eprintln!(
        "{} emails, {} valid, {} invalid",
        summary.total_emails, summary.valid_email_count, summary.invalid_email_count
    );
    Ok(())
}
