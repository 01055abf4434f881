use crate::{Result, UpstreamError};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TEMPLATE_EXTENSION: &str = "html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDocument {
    pub name: String,
    pub html: String,
}

/// HTML bodies stored as `<dir>/<name>.html`.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Template names, sorted. A missing directory holds no templates.
    pub fn list_templates(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_template = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
            if !is_template || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load_template(&self, name: &str) -> Result<TemplateDocument> {
        let name = validate_name(name)?;
        let path = self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
        let html = match fs::read_to_string(&path) {
            Ok(html) => html,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(UpstreamError::TemplateNotFound(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(TemplateDocument {
            name: name.to_string(),
            html,
        })
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_suffix(".html").unwrap_or(trimmed);
    let bad = trimmed.is_empty()
        || trimmed.contains(['/', '\\'])
        || trimmed.contains("..")
        || trimmed.starts_with('.');
    if bad {
        return Err(UpstreamError::InvalidTemplateName(name.to_string()));
    }
    Ok(trimmed)
}
