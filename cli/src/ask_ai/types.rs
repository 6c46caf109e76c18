use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskAITemplate {
    pub id: String,
    pub title: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    English,
    #[default]
    Chinese,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "zh" | "cn" | "chinese" => Ok(Language::Chinese),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Values substituted into `{num}` and `{symbol}` placeholders
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    pub num: Option<usize>,
    pub symbol: Option<String>,
}

impl PromptVars {
    pub fn with_num(num: usize) -> Self {
        Self {
            num: Some(num),
            ..Default::default()
        }
    }

    pub fn with_symbol(symbol: &str) -> Self {
        Self {
            symbol: Some(symbol.to_string()),
            ..Default::default()
        }
    }
}
