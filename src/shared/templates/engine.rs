//! Template engine for outgoing mail, using Jinja2 syntax.
//!
//! Templates live in `templates/` at the project root and are compiled into
//! the binary, so the worker never depends on the working directory.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Bundled templates as (name, source) pairs
const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    (
        "email/idea_status_updated.jinja",
        include_str!("../../../templates/email/idea_status_updated.jinja"),
    ),
    (
        "email/idea_status_updated.subject.jinja",
        include_str!("../../../templates/email/idea_status_updated.subject.jinja"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in BUNDLED_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a bundled template with the given context.
///
/// # Example
/// ```ignore
/// let body = render_template(
///     "email/idea_status_updated.jinja",
///     minijinja::context! { idea_title => "Dark mode", status_name => "Open" },
/// )?;
/// ```
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[cfg(test)]
pub fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}
