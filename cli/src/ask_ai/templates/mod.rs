pub mod select_en;
pub mod select_zh;

use super::types::{AskAITemplate, Language};

pub fn get_templates(language: &Language) -> Vec<AskAITemplate> {
    match language {
        Language::English => select_en::get_select_templates_en(),
        Language::Chinese => select_zh::get_select_templates_zh(),
    }
}

pub fn get_template_by_id(id: &str, language: &Language) -> Option<AskAITemplate> {
    get_templates(language)
        .into_iter()
        .find(|template| template.id == id)
}
