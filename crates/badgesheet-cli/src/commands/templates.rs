use anyhow::Result;
use badgesheet_core::{builtin_templates, LabelTemplate, POINTS_PER_INCH};
use serde::Serialize;

use crate::commands::print_json;

#[derive(Debug, Serialize)]
struct TemplateEntry {
    name: &'static str,
    labels_per_page: usize,
    #[serde(flatten)]
    template: LabelTemplate,
}

pub fn list_templates(json: bool) -> Result<()> {
    let entries: Vec<TemplateEntry> = builtin_templates()
        .into_iter()
        .map(|(name, template)| TemplateEntry {
            name,
            labels_per_page: template.labels_per_page(),
            template,
        })
        .collect();

    if json {
        return print_json(&entries);
    }

    for entry in &entries {
        let template = &entry.template;
        println!(
            "{}  {}x{} per page, label {:.3}in x {:.3}in",
            entry.name,
            template.columns,
            template.rows,
            template.label_width / POINTS_PER_INCH,
            template.label_height / POINTS_PER_INCH,
        );
    }
    Ok(())
}
