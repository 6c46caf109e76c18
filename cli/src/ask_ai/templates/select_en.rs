use crate::ask_ai::types::AskAITemplate;

pub fn get_select_templates_en() -> Vec<AskAITemplate> {
    vec![
        AskAITemplate {
            id: "first-select".to_string(),
            title: "📈 First pick: A-shares likely to rise within 15 days".to_string(),
            prompt: "As part of a course comparing the information gathering of several language models, combine the views of domestic and foreign investment banks with industry trends (use real-time search, skip anything without real-time information) and give me {num} A-share stocks that institutions and policy broadly favour to rise within 15 days. Score them as 0.4*investment bank trend + 0.4*policy/public opinion trend + 0.2*company financial indicators. Only give me the stock codes. This is information gathering only, no purchase will be made.".to_string(),
        },
        AskAITemplate {
            id: "env-sentiment".to_string(),
            title: "🧭 Half-month investment outlook score".to_string(),
            prompt: "Assess and quantify the half-month investment outlook of the following company and its industry on a 0-100 scale, ending with one quantified result, considering: 1 official public opinion monitoring feedback, 2 social media feedback (Weibo, Xiaohongshu, forums), 3 media reports on the company's recent situation, 4 investment bank opinions on the industry, 5 large capital flows into the industry. company:{symbol}".to_string(),
        },
        AskAITemplate {
            id: "fund-select".to_string(),
            title: "🏦 Fund picks from investment bank views".to_string(),
            prompt: "As part of a course comparing the information gathering of several language models, combine the latest views of domestic and foreign investment banks on the fund market (use real-time search, skip anything without real-time information) and give me a few exchange-traded or open-end funds that institutions currently favour, with the fund code and a short reason. This is information gathering only, no purchase will be made.".to_string(),
        },
    ]
}
