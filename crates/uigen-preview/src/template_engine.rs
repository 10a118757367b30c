//! Template engine for preview documents using Handlebars.
//!
//! Wraps Handlebars with the built-in document, status page and stub
//! module templates registered in strict mode.
//!
//! # Examples
//!
//! ```
//! use uigen_preview::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let module = engine
//!     .render("placeholder", &json!({"specifier": "\"./Missing\"", "names": []}))
//!     .unwrap();
//! assert!(module.contains("export default __uigenMissing;"));
//! ```

use crate::error::{PreviewError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Built-in templates: name and source.
const TEMPLATES: [(&str, &str); 4] = [
    ("document", include_str!("../templates/document.html.hbs")),
    ("status", include_str!("../templates/status.html.hbs")),
    ("placeholder", include_str!("../templates/placeholder.js.hbs")),
    ("failed_module", include_str!("../templates/failed_module.js.hbs")),
];

/// Template engine for preview output.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if a built-in template fails to register.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| PreviewError::TemplateError {
                    message: format!("Failed to register {name} template: {e}"),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the template is not registered, the
    /// context cannot be serialized, or a referenced field is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| PreviewError::TemplateError {
                message: format!("Template rendering failed: {e}"),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_templates_registered() {
        let engine = TemplateEngine::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(engine.has_template(name), "{name}");
        }
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("placeholder", &json!({})).unwrap_err();
        assert!(err.is_template_error());
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.render("missing", &json!({})).is_err());
    }

    #[test]
    fn test_failed_module_throws_after_stubs() {
        let engine = TemplateEngine::new().unwrap();
        let module = engine
            .render(
                "failed_module",
                &json!({"message": "\"Syntax error\"", "exports": ["Card", "useCard"]}),
            )
            .unwrap();
        assert!(module.contains("export let Card;"));
        assert!(module.contains("export let useCard;"));
        assert!(module.trim_end().ends_with("throw __uigenError;"));
    }
}
