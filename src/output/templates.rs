// Template engine for generating HTML output

use crate::error::{Error, Result};
use crate::output::context::RenderContext;
use tera::{Context, Tera};

/// The packaged templates a run can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Stylesheet,
    About,
    Entry,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Stylesheet => "style.css",
            Template::About => "about.html",
            Template::Entry => "entry.html",
        }
    }
}

/// Template engine wrapping Tera with the run's filters
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create an engine over the embedded templates, with filters bound to
    /// the given render context
    pub fn new(render: &RenderContext) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html.tera")),
            ("about.html", include_str!("../../templates/about.html.tera")),
            ("entry.html", include_str!("../../templates/entry.html.tera")),
            ("style.css", include_str!("../../templates/style.css.tera")),
        ])
        .map_err(|e| Error::template("packaged templates", e))?;

        render.register_filters(&mut tera);

        Ok(Self { tera })
    }

    /// Render one of the packaged templates
    pub fn render(&self, template: Template, context: &Context) -> Result<String> {
        self.tera
            .render(template.name(), context)
            .map_err(|e| Error::template(template.name(), e))
    }
}
