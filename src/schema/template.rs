//! Printable equipment labels rendered with Tera

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::entities::Equipment;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const LABEL_TEMPLATE: &str = "label.txt.tera";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Renders equipment labels from the embedded templates
pub struct LabelRenderer {
    tera: Tera,
}

impl LabelRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        // Labels are plain text
        tera.autoescape_on(vec![]);

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the label for one item
    pub fn render(&self, equipment: &Equipment) -> Result<String, TemplateError> {
        let mut context = tera::Context::new();
        context.insert("code", equipment.label_code());
        context.insert("name", &equipment.name);
        context.insert("category", &equipment.category);
        context.insert("id", &equipment.id.to_string());
        context.insert("stock", &equipment.stock);

        if self.tera.get_template_names().any(|n| n == LABEL_TEMPLATE) {
            self.tera
                .render(LABEL_TEMPLATE, &context)
                .map_err(|e| TemplateError::RenderError(e.to_string()))
        } else {
            Ok(hardcoded_label(equipment))
        }
    }
}

fn hardcoded_label(equipment: &Equipment) -> String {
    let rule = "=".repeat(30);
    format!(
        "{rule}\n  {}\n  {}\n  {}\n{}\n  {}\n{rule}\n",
        equipment.label_code(),
        equipment.name,
        equipment.category,
        "-".repeat(30),
        equipment.id,
    )
}
