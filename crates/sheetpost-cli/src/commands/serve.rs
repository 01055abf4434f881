use crate::commands::{Context, ProviderArg};
use crate::mailer::build_mailer;
use crate::server::{self, AppState};
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args};
use sheetpost_io::source_from_config;
use std::net::SocketAddr;
use tokio::runtime::Runtime;
use tracing::warn;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on; defaults to server.bind
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
    /// Accept send requests without contacting the mail server
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

pub fn serve(ctx: &Context<'_>, args: ServeArgs) -> Result<()> {
    let source = source_from_config(&ctx.config.source, args.provider.map(Into::into))
        .with_context(|| "open sheet source")?;
    let mailer = if args.dry_run || ctx.config.smtp.is_some() {
        Some(build_mailer(ctx.config, args.dry_run)?)
    } else {
        warn!("smtp is not configured; send requests will be rejected");
        None
    };

    let state = AppState {
        config: ctx.config.clone(),
        source,
        mailer,
        templates: ctx.templates(),
    };
    let bind = args.bind.unwrap_or(ctx.config.server.bind);

    let runtime = Runtime::new().with_context(|| "start async runtime")?;
    runtime.block_on(server::run(bind, state))
}
