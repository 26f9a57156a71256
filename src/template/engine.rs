// ABOUTME: Handlebars engine configuration shared by all value templates
// ABOUTME: Configures strict mode, output escaping and helpers, then compiles value templates

use handlebars::Handlebars;

use super::error::Result;
use super::helpers;
use super::value::{TemplateSource, ValueTemplate};

#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with all built-in helpers
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // Unbound lookups must fail so callers can tell "unset" apart from ""
        handlebars.set_strict_mode(true);
        handlebars.set_dev_mode(false);

        // Values end up in variable stores, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        helpers::register_helpers(&mut handlebars);

        Self { handlebars }
    }

    /// Compile a template source into a reusable value template
    pub fn compile(&self, source: TemplateSource) -> Result<ValueTemplate> {
        ValueTemplate::compile(self.handlebars.clone(), source)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
