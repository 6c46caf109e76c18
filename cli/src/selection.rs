//! Candidate selection driven by chat answers.
//!
//! The chat model is reached through [`ChatOracle`]; the browser-backed
//! implementation lives in the binary, [`CannedOracle`] serves test mode.

use crate::ask_ai::{self, Language, PromptVars, ANSWER_MARKER};
use crate::models::ScoredSymbol;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Answer does not contain the ANS marker: {0}")]
    MissingMarker(String),
    #[error("Answer contains no usable items: {0}")]
    EmptyAnswer(String),
    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),
    #[error("Chat oracle failed: {0}")]
    Oracle(String),
    #[error("{codes} codes but {scores} scores")]
    LengthMismatch { codes: usize, scores: usize },
}

/// Anything that can answer a prompt with free text
#[async_trait]
pub trait ChatOracle: Send + Sync {
    async fn ask(&self, prompt: &str) -> anyhow::Result<String>;

    fn name(&self) -> &str;
}

/// Returns the same answer for every prompt
#[derive(Debug, Clone)]
pub struct CannedOracle {
    answer: String,
}

impl CannedOracle {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }

    /// Test-mode answer for the first selection
    pub fn first_select() -> Self {
        Self::new("ANS 000002")
    }

    /// Test-mode answer for the sentiment score
    pub fn sentiment() -> Self {
        Self::new("ANS 90")
    }

    /// Test-mode answer for the fund recommendation
    pub fn fund_select() -> Self {
        Self::new("ANS 110011 161725")
    }
}

#[async_trait]
impl ChatOracle for CannedOracle {
    async fn ask(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn answer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?s){}[:：]?(.*)", ANSWER_MARKER)).expect("answer regex is valid")
    })
}

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{6}\b").expect("code regex is valid"))
}

/// Tokens following the answer marker, split on whitespace and commas
pub fn parse_answer(text: &str) -> Result<Vec<String>, SelectionError> {
    let rest = answer_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| SelectionError::MissingMarker(text.to_string()))?;

    Ok(rest
        .as_str()
        .split(|c: char| c.is_whitespace() || c == ',' || c == '，' || c == '、')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect())
}

/// Six-digit codes in answer order, de-duplicated
pub fn extract_codes(tokens: &[String]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for token in tokens {
        for m in code_regex().find_iter(token) {
            let code = m.as_str().to_string();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
    }
    codes
}

async fn ask_template(
    oracle: &dyn ChatOracle,
    template_id: &str,
    language: &Language,
    vars: &PromptVars,
) -> Result<String, SelectionError> {
    let prompt = ask_ai::build_prompt(template_id, language, vars)
        .ok_or_else(|| SelectionError::UnknownTemplate(template_id.to_string()))?;
    debug!(oracle = oracle.name(), template = template_id, "Asking chat oracle");

    oracle
        .ask(&prompt)
        .await
        .map_err(|e| SelectionError::Oracle(e.to_string()))
}

/// First selection: ask for `num` codes likely to rise
pub async fn select_first(
    num: usize,
    oracle: &dyn ChatOracle,
    language: &Language,
) -> Result<Vec<String>, SelectionError> {
    let answer = ask_template(oracle, ask_ai::FIRST_SELECT, language, &PromptVars::with_num(num)).await?;
    let tokens = parse_answer(&answer)?;
    let codes = extract_codes(&tokens);

    if codes.is_empty() {
        return Err(SelectionError::EmptyAnswer(answer));
    }
    if codes.len() > num {
        warn!(asked = num, got = codes.len(), "Oracle returned more codes than requested");
    }

    info!(count = codes.len(), codes = ?codes, "First selection complete");
    Ok(codes)
}

/// Half-month outlook score in 0-100, the mean of the numbers in the answer
pub async fn sentiment_score(
    code: &str,
    oracle: &dyn ChatOracle,
    language: &Language,
) -> Result<f64, SelectionError> {
    let answer =
        ask_template(oracle, ask_ai::ENV_SENTIMENT, language, &PromptVars::with_symbol(code)).await?;
    let values: Vec<f64> = parse_answer(&answer)?
        .iter()
        .filter_map(|token| token.trim_end_matches(['分', '%', '。', '.']).parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return Err(SelectionError::EmptyAnswer(answer));
    }

    let score = values.iter().sum::<f64>() / values.len() as f64;
    debug!(code = code, score = score, "Sentiment score");
    Ok(score)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub fundamental: f64,
    pub technical: f64,
    pub sentiment: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            fundamental: 0.3,
            technical: 0.7,
            sentiment: 0.0,
        }
    }
}

/// Final screening score; a missing sentiment contributes nothing
pub fn blend(fundamental: f64, technical: f64, sentiment: Option<f64>, weights: &BlendWeights) -> f64 {
    weights.fundamental * fundamental
        + weights.technical * technical
        + weights.sentiment * sentiment.unwrap_or(0.0)
}

/// Second selection: rank codes by score, highest first, ties keep input order
pub fn select_second(codes: Vec<String>, scores: Vec<f64>) -> Result<Vec<ScoredSymbol>, SelectionError> {
    if codes.len() != scores.len() {
        return Err(SelectionError::LengthMismatch {
            codes: codes.len(),
            scores: scores.len(),
        });
    }

    let mut ranked: Vec<ScoredSymbol> = codes
        .into_iter()
        .zip(scores)
        .map(|(code, score)| ScoredSymbol { code, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_tokens() {
        let tokens = parse_answer("ANS 600519 000858 300750").unwrap();
        assert_eq!(tokens, vec!["600519", "000858", "300750"]);
    }

    #[test]
    fn test_parse_answer_marker_inside_text() {
        let tokens = parse_answer("好的。ANS：600519，000858").unwrap();
        assert_eq!(tokens, vec!["600519", "000858"]);
    }

    #[test]
    fn test_parse_answer_without_marker() {
        assert!(matches!(
            parse_answer("600519 000858"),
            Err(SelectionError::MissingMarker(_))
        ));
    }

    #[test]
    fn test_extract_codes_dedupes() {
        let tokens: Vec<String> = ["600519(贵州茅台)", "000858", "600519", "abc"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(extract_codes(&tokens), vec!["600519", "000858"]);
    }

    #[tokio::test]
    async fn test_select_first_canned() {
        let codes = select_first(10, &CannedOracle::first_select(), &Language::Chinese)
            .await
            .unwrap();
        assert_eq!(codes, vec!["000002"]);
    }

    #[tokio::test]
    async fn test_select_first_empty_answer() {
        let oracle = CannedOracle::new("ANS 暂无实时信息");
        let err = select_first(5, &oracle, &Language::Chinese).await.unwrap_err();
        assert!(matches!(err, SelectionError::EmptyAnswer(_)));
    }

    #[tokio::test]
    async fn test_sentiment_score_mean() {
        assert_eq!(
            sentiment_score("600519", &CannedOracle::sentiment(), &Language::Chinese)
                .await
                .unwrap(),
            90.0
        );

        let oracle = CannedOracle::new("ANS 2025-07-19 80 70分");
        let score = sentiment_score("600519", &oracle, &Language::Chinese).await.unwrap();
        assert_eq!(score, 75.0);
    }

    #[test]
    fn test_blend_default_weights() {
        let w = BlendWeights::default();
        assert!((blend(80.0, 60.0, None, &w) - 66.0).abs() < 1e-9);
        assert!((blend(80.0, 60.0, Some(90.0), &w) - 66.0).abs() < 1e-9);

        let with_sentiment = BlendWeights {
            fundamental: 0.3,
            technical: 0.4,
            sentiment: 0.3,
        };
        assert!((blend(80.0, 60.0, Some(90.0), &with_sentiment) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_select_second_orders_descending() {
        let codes = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let ranked = select_second(codes, vec![50.0, 70.0, 50.0]).unwrap();
        let order: Vec<&str> = ranked.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(ranked[0].score, 70.0);
    }

    #[test]
    fn test_select_second_length_mismatch() {
        let err = select_second(vec!["a".to_string()], vec![]).unwrap_err();
        assert!(matches!(err, SelectionError::LengthMismatch { codes: 1, scores: 0 }));
    }
}
