use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, error, info, warn};

use super::report::Report;
use crate::error::Result;

/// Name of the fixed-point filter available to templates
pub const FIXED_FILTER: &str = "fixed";

/// Renders reports through a tera template
pub struct TemplateRenderer {
    template_engine: Tera,
    name: String,
}

impl TemplateRenderer {
    /// Compiles `template`; `name` decides autoescaping (`.html`, `.htm`, `.xml`)
    pub fn new(name: &str, template: &str) -> Result<Self> {
        let mut template_engine = Tera::default();
        template_engine.register_filter(FIXED_FILTER, fixed);
        template_engine.add_raw_template(name, template)?;

        Ok(Self {
            template_engine,
            name: name.to_string(),
        })
    }

    pub fn render(&self, report: &Report) -> Result<String> {
        let context = Context::from_serialize(report.view())?;
        Ok(self.template_engine.render(&self.name, &context)?)
    }
}

/// `{{ value | fixed }}` renders a number with two decimals, `fixed(digits=n)` with n
fn fixed(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let digits = match args.get("digits") {
        Some(digits) => digits
            .as_u64()
            .ok_or_else(|| tera::Error::msg("`digits` must be a non-negative integer"))?
            as usize,
        None => 2,
    };

    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| tera::Error::msg(format!("Filter `{FIXED_FILTER}` expects a number, got {value}")))?;

    Ok(Value::String(format!("{number:.digits$}")))
}

/// Structured dump used when no template applies
pub fn dump(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Reads `<templates_dir>/<name>`, or `None` when the file does not exist
pub async fn read_template(templates_dir: &Path, name: &Path) -> Result<Option<String>> {
    let path = templates_dir.join(name);

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            debug!("Loaded template {}", path.display());
            Ok(Some(content))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Template {} not found, falling back to structured output",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Renders `report` with the named template, or dumps it when there is none
pub async fn render_report(
    report: &Report,
    templates_dir: &Path,
    template: Option<&Path>,
) -> Result<String> {
    let Some(name) = template else {
        return dump(report);
    };

    match read_template(templates_dir, name).await? {
        Some(content) => {
            TemplateRenderer::new(&name.to_string_lossy(), &content)?.render(report)
        }
        None => dump(report),
    }
}

/// Writes the rendered report; failures are logged, never returned
pub async fn write_output(output: &Path, content: &str) {
    info!("Writing to file {}", output.display());

    if let Err(e) = tokio::fs::write(output, content).await {
        error!("Failure while writing to file {}: {}", output.display(), e);
    }
}
