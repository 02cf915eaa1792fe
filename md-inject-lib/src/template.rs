//! Template rendering applied to injected content before it is placed
//! between the markers.
//!
//! Templates use the MiniJinja dialect and see the injected text as the
//! `stdin` variable, e.g. ``"```text\n{{ stdin }}```"`` wraps the input in a
//! fenced code block.

use crate::error::InjectError;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::{Map, Value};

/// Name of the variable bound to the injected content.
pub const STDIN_VAR: &str = "stdin";

/// Template that renders the injected content unchanged.
pub const DEFAULT_TEMPLATE: &str = "{{ stdin }}";

// No extension, so MiniJinja never enables auto-escaping.
const TEMPLATE_NAME: &str = "inject";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders `template` with the variables in `context`.
    ///
    /// Implementations report syntax problems as [`InjectError::TemplateParse`]
    /// and evaluation problems as [`InjectError::TemplateRender`].
    fn render(&self, template: &str, context: &Value) -> Result<String, InjectError>;
}

/// MiniJinja-based template rendering engine.
///
/// Undefined variables are rejected instead of rendering as empty strings,
/// and a trailing newline in the template source is kept.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, InjectError> {
        let mut env = self.env.clone();
        env.add_template(TEMPLATE_NAME, template)
            .map_err(|err| InjectError::TemplateParse(err.to_string()))?;

        let tmpl = env
            .get_template(TEMPLATE_NAME)
            .map_err(|err| InjectError::TemplateParse(err.to_string()))?;

        tmpl.render(context)
            .map_err(|err| InjectError::TemplateRender(err.to_string()))
    }
}

/// Applies `template` to `content` using the default [`MiniJinjaRenderer`].
pub fn apply_template(template: &str, content: &str) -> Result<String, InjectError> {
    apply_template_with(&MiniJinjaRenderer::new(), template, content)
}

/// Applies `template` to `content` using the given renderer.
///
/// The default template short-circuits and returns `content` as-is.
pub fn apply_template_with<R: TemplateRenderer + ?Sized>(
    renderer: &R,
    template: &str,
    content: &str,
) -> Result<String, InjectError> {
    if template == DEFAULT_TEMPLATE {
        return Ok(content.to_string());
    }

    log::debug!("Rendering template over {} bytes of input", content.len());
    let mut context = Map::new();
    context.insert(STDIN_VAR.to_string(), Value::from(content));
    renderer.render(template, &Value::Object(context))
}
