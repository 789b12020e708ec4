//! Page template engine using Jinja2 syntax.
//!
//! Templates live under `templates/pages/` and are loaded once at startup.
//! Files ending in `.html` are autoescaped.

use minijinja::{Environment, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Template directory shipped with the crate
pub const TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/pages");

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to load template '{0}': {1}")]
    LoadError(String, String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Renders HTML pages from a preloaded template environment
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Load every `.html` template below `dir`, named by relative path
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let base = dir.as_ref().to_path_buf();
        let mut env = Environment::new();

        let mut files = Vec::new();
        collect_templates(&base, &mut files)?;

        for path in files {
            let relative = path
                .strip_prefix(&base)
                .map_err(|e| TemplateError::LoadError(path.display().to_string(), e.to_string()))?;
            // Forward slashes keep `{% extends "base.html" %}` portable
            let name = relative.to_string_lossy().replace('\\', "/");
            let content = std::fs::read_to_string(&path)
                .map_err(|e| TemplateError::LoadError(name.clone(), e.to_string()))?;

            env.add_template_owned(name.clone(), content)
                .map_err(|e| TemplateError::LoadError(name.clone(), e.to_string()))?;
            tracing::debug!("Loaded template: {}", name);
        }

        Ok(Self { env })
    }

    /// Load the templates bundled in the crate directory
    pub fn bundled() -> Result<Self, TemplateError> {
        Self::from_dir(TEMPLATE_DIR)
    }

    /// Render a template with the given context.
    ///
    /// # Example
    /// ```ignore
    /// let html = renderer.render("tool_detail.html", minijinja::context! { tool => dto })?;
    /// ```
    pub fn render(&self, template_name: &str, ctx: Value) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(format!("{}: {:#}", template_name, e)))
    }

    #[cfg(test)]
    pub fn template_exists(&self, template_name: &str) -> bool {
        self.env.get_template(template_name).is_ok()
    }
}

/// Recursively collect all .html templates from a directory
fn collect_templates(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), TemplateError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| TemplateError::LoadError(dir.display().to_string(), e.to_string()))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_templates(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            out.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_bundled_templates_load() {
        let renderer = PageRenderer::bundled().unwrap();
        for name in [
            "base.html",
            "index.html",
            "directory.html",
            "tool_detail.html",
            "add_tool.html",
            "checkout_success.html",
            "error.html",
        ] {
            assert!(renderer.template_exists(name), "missing template {}", name);
        }
    }

    #[test]
    fn test_missing_template() {
        let renderer = PageRenderer::bundled().unwrap();
        let result = renderer.render("definitely_not_a_real_template.html", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_error_page_escapes_html() {
        let renderer = PageRenderer::bundled().unwrap();
        let html = renderer
            .render(
                "error.html",
                context! { status => 404, title => "Page not found", message => "<script>x</script>" },
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>x</script>"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let result = PageRenderer::from_dir("/definitely/not/a/template/dir");
        assert!(matches!(result, Err(TemplateError::LoadError(_, _))));
    }
}
