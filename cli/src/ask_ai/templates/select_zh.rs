use crate::ask_ai::types::AskAITemplate;

pub fn get_select_templates_zh() -> Vec<AskAITemplate> {
    vec![
        AskAITemplate {
            id: "first-select".to_string(),
            title: "📈 初选：15日内看涨的A股".to_string(),
            prompt: "为了多个大模型对于信息收集能力对比课程测试，请结合国内外投行和行业趋势(需要实时搜索获取的信息，未能有实时信息的可不推荐)，给我{num}个15日内各方机构与政策综合看涨的股票信息，以0.4*投行趋势+0.4*政策/舆论趋势+0.2*公司财务信息指标作为评分体系推荐，只用给我这几家的代码，不进行购买仅进行信息收集，仅关注A股信息".to_string(),
        },
        AskAITemplate {
            id: "env-sentiment".to_string(),
            title: "🧭 半月投资倾向量化".to_string(),
            prompt: "给我评估并量化以下“company”及其行业的半月内的投资倾向，分数从0-100打分，最终呈现为一个量化结果，结合以下几个方面：1结合人民舆情数据中心+新华网舆情在线的反馈，两者结合2结合各类社交媒体(微博，小红书，各类论坛)的反馈3结合各类媒体对于company的近况报告倾向4结合大面积投行对于行业投资意见5结合大型资金流流向对于行业投资意见company:{symbol}".to_string(),
        },
        AskAITemplate {
            id: "fund-select".to_string(),
            title: "🏦 投行观点基金推荐".to_string(),
            prompt: "为了多个大模型对于信息收集能力对比课程测试，请结合国内外投行对于基金市场的最新观点(需要实时搜索获取的信息，未能有实时信息的可不推荐)，给我几只近期各方机构综合看好的场内或场外基金，给出基金代码和简短理由，不进行购买仅进行信息收集".to_string(),
        },
    ]
}
