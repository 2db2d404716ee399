//! `stencil render`: one-shot, non-interactive rendering.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use stencil_core::session::validate_path;
use stencil_core::template::{self, DataMap};

/// Renders `template_path` with `data_path`, printing to stdout unless
/// `output` is given.
///
/// Applies the same path rules as the interactive session.
pub fn run(template_path: &str, data_path: &str, output: Option<&Path>) -> Result<()> {
    let template_path = validate_path(template_path, ".html")
        .map_err(|reason| anyhow!("Invalid template path: {}", reason))?;
    let data_path =
        validate_path(data_path, ".json").map_err(|reason| anyhow!("Invalid data path: {}", reason))?;

    let template = fs::read_to_string(template_path)
        .with_context(|| format!("Template not found: {}", template_path))?;
    let text = fs::read_to_string(data_path)
        .with_context(|| format!("Data file not found: {}", data_path))?;
    let data = DataMap::from_json_str(&text).map_err(|e| {
        let label = if e.is_invalid_data() { "Unusable data in" } else { "Invalid JSON in" };
        anyhow::Error::new(e).context(format!("{} {}", label, data_path))
    })?;

    let missing = template::missing_keys(&template, &data);
    if !missing.is_empty() {
        tracing::warn!(?missing, "Placeholders without data render empty");
    }

    let rendered = template::render(&template, &data);
    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
