use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use sheetpost_config::{AppConfig, SourceProvider};
use sheetpost_core::Record;
use sheetpost_io::{load_records, source_from_config, SheetSource, TemplateStore};
use std::io::{self, Write};
use std::path::PathBuf;

pub mod completions;
pub mod contacts;
pub mod send;
pub mod serve;
pub mod sheets;
pub mod templates;
pub mod validate;

const DEFAULT_TEMPLATES_DIR: &str = "templates";

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn source(&self, args: &SourceArgs) -> Result<Box<dyn SheetSource>> {
        source_from_config(&self.config.source, args.provider.map(Into::into))
            .with_context(|| "open sheet source")
    }

    pub fn load_records(&self, args: &SourceArgs) -> Result<Vec<Record>> {
        let source = self.source(args)?;
        let sheet = resolve_sheet(self.config, args.sheet.clone())?;
        let range = resolve_range(self.config, args.range.clone());
        fetch_records(source.as_ref(), &sheet, &range)
    }

    pub fn templates(&self) -> TemplateStore {
        template_store(self.config)
    }
}

/// Spreadsheet selection shared by every data command.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Spreadsheet id, CSV file or directory of CSV files
    #[arg(long)]
    pub sheet: Option<String>,
    /// A1 range such as `Sheet1!A1:Z`
    #[arg(long)]
    pub range: Option<String>,
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProviderArg {
    Csv,
    GoogleSheets,
}

impl From<ProviderArg> for SourceProvider {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Csv => SourceProvider::Csv,
            ProviderArg::GoogleSheets => SourceProvider::GoogleSheets,
        }
    }
}

pub fn resolve_sheet(config: &AppConfig, sheet: Option<String>) -> Result<String> {
    sheet
        .or_else(|| config.source.sheet.clone())
        .map(|sheet| sheet.trim().to_string())
        .filter(|sheet| !sheet.is_empty())
        .ok_or_else(|| invalid_input("no sheet given; pass --sheet or set source.sheet"))
}

pub fn resolve_range(config: &AppConfig, range: Option<String>) -> String {
    range
        .map(|range| range.trim().to_string())
        .filter(|range| !range.is_empty())
        .unwrap_or_else(|| config.source.range.clone())
}

pub fn fetch_records(source: &dyn SheetSource, sheet: &str, range: &str) -> Result<Vec<Record>> {
    load_records(source, sheet, range).with_context(|| format!("load {sheet} ({range})"))
}

pub fn template_store(config: &AppConfig) -> TemplateStore {
    let dir = config
        .templates
        .dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR));
    TemplateStore::new(dir)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
