pub mod templates;
pub mod types;

pub use templates::{get_template_by_id, get_templates};
pub use types::*;

pub const FIRST_SELECT: &str = "first-select";
pub const ENV_SENTIMENT: &str = "env-sentiment";
pub const FUND_SELECT: &str = "fund-select";

/// Marker every chat answer must start with
pub const ANSWER_MARKER: &str = "ANS";

/// Instruction prepended to every prompt so the answer can be parsed
pub fn answer_instruction(language: &Language) -> &'static str {
    match language {
        Language::Chinese => "以ANS作为回答的开头，以空格分离回答信息,",
        Language::English => {
            "Start your answer with ANS and separate the items of the answer with single spaces. "
        }
    }
}

/// Fill the `{num}` and `{symbol}` placeholders of a template
pub fn render(template: &AskAITemplate, vars: &PromptVars) -> String {
    let mut prompt = template.prompt.clone();
    if let Some(num) = vars.num {
        prompt = prompt.replace("{num}", &num.to_string());
    }
    if let Some(symbol) = &vars.symbol {
        prompt = prompt.replace("{symbol}", symbol);
    }
    prompt
}

/// Look up a template, render it, and prefix the answer instruction
pub fn build_prompt(id: &str, language: &Language, vars: &PromptVars) -> Option<String> {
    get_template_by_id(id, language)
        .map(|template| format!("{}{}", answer_instruction(language), render(&template, vars)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let template = get_template_by_id(FIRST_SELECT, &Language::Chinese).unwrap();
        let prompt = render(&template, &PromptVars::with_num(10));
        assert!(prompt.contains("给我10个15日内"));
        assert!(!prompt.contains("{num}"));
    }

    #[test]
    fn test_env_prompt_names_company() {
        let template = get_template_by_id(ENV_SENTIMENT, &Language::Chinese).unwrap();
        let prompt = render(&template, &PromptVars::with_symbol("600519"));
        assert!(prompt.ends_with("company:600519"));
    }

    #[test]
    fn test_build_prompt_prefixes_instruction() {
        let prompt = build_prompt(FUND_SELECT, &Language::English, &PromptVars::default()).unwrap();
        assert!(prompt.starts_with("Start your answer with ANS"));
        assert!(build_prompt("unknown", &Language::English, &PromptVars::default()).is_none());
    }

    #[test]
    fn test_every_template_exists_in_both_languages() {
        for language in [Language::Chinese, Language::English] {
            for id in [FIRST_SELECT, ENV_SENTIMENT, FUND_SELECT] {
                assert!(get_template_by_id(id, &language).is_some(), "{id} missing");
            }
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Chinese);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert!("vi".parse::<Language>().is_err());
    }
}
