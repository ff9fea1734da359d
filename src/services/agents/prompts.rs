//! Instruction templates for the analysis agents.
//!
//! The reviewed contracts are Chinese-language documents, so the prompts are
//! too. Every structured prompt pins the JSON shape the reply must take.

/// Clause extraction: nine categories, each present even when absent from the contract.
pub const CLAUSE_EXTRACTION_SYSTEM: &str = "\
你是一个专业的合同条款分析专家。你的任务是从合同文本中提取关键条款信息。
请识别并提取以下类型的条款：
1. 合同双方信息
2. 合同标的
3. 价格与支付条款
4. 交付条款
5. 违约责任
6. 争议解决方式
7. 保密条款
8. 合同有效期
9. 终止条款

请以JSON格式返回结果，包含条款类型和对应的条款内容。
如果某个条款类型在合同中未找到，请在JSON中包含该条款类型并将其值设为\"未找到\"。";

/// The nine clause categories requested by [`CLAUSE_EXTRACTION_SYSTEM`].
pub const CLAUSE_CATEGORIES: [&str; 9] = [
    "合同双方信息",
    "合同标的",
    "价格与支付条款",
    "交付条款",
    "违约责任",
    "争议解决方式",
    "保密条款",
    "合同有效期",
    "终止条款",
];

/// Value a clause category takes when the contract does not contain it.
pub const CLAUSE_NOT_FOUND: &str = "未找到";

pub const CLAUSE_EXTRACTION_USER: &str = "请分析以下合同文本并提取关键条款信息：";

/// Risk scoring: per-clause level, overall 0-100 score and banding.
pub const RISK_ANALYSIS_SYSTEM: &str = "\
你是一位经验丰富的合同风险评估专家。基于提取的合同关键条款信息，
请对合同进行风险量化分析。评估每个条款的风险等级（低、中、高），
计算总体风险得分（0-100分），并提供详细的风险分析报告。

请以JSON格式返回结果，包含以下内容：
1. 各条款风险评估（风险等级和理由）
2. 总体风险得分
3. 主要风险点摘要
4. 风险等级（基于总体得分：0-30低风险，31-60中等风险，61-100高风险）";

pub const RISK_ANALYSIS_USER: &str = "请对以下合同条款进行风险量化分析：";

/// Normative checks applied when the caller supplies no compliance rules.
pub const DEFAULT_COMPLIANCE_RULES: &str = "\
1. 合同必须明确双方当事人的名称、地址和联系方式。
2. 合同标的必须明确、具体，具有可操作性。
3. 价格条款必须明确金额、支付方式和支付时间。
4. 交付条款必须明确交付时间、地点和方式。
5. 违约责任条款必须明确双方的责任和赔偿方式。
6. 争议解决条款必须符合法律规定，明确解决方式。
7. 保密条款必须明确保密信息范围和保密期限。
8. 合同有效期必须明确起始和终止日期。
9. 终止条款必须明确终止条件和程序。";

/// Compliance check system prompt around the given rule set.
pub fn compliance_system(rules: &str) -> String {
    format!(
        "你是一位资深的合同合规性审查专家。请根据以下合规性规则，
对提供的合同条款进行合规性分析：

{}

请以JSON格式返回结果，包含：
1. 各条款合规性评估（合规、不合规、部分合规）
2. 不合规条款的详细说明和建议
3. 总体合规性评级（合规、基本合规、不合规）
4. 合规性得分（0-100分）",
        rules.trim()
    )
}

pub const COMPLIANCE_ANALYSIS_USER: &str = "请对以下合同条款进行合规性分析：";

/// Report drafting: six named sections, prose output.
pub const REPORT_GENERATION_SYSTEM: &str = "\
你是一位专业的合同审查报告撰写专家。请根据提供的合同条款信息、
风险分析数据和合规性分析数据，生成一份全面的合同审查报告。

报告应包括以下部分：
1. 报告概述（包括合同基本信息和审查日期）
2. 关键条款摘要
3. 风险评估结果
4. 合规性分析结果
5. 综合评估与建议
6. 整改建议清单

请以清晰、专业的语言撰写报告，确保内容准确、有逻辑性且易于理解。";

pub const REPORT_GENERATION_USER: &str = "请根据以下数据生成合同审查报告：";

/// Envelope keys wrapping the three structured inputs of the report stage.
pub const REPORT_KEY_CLAUSES: &str = "条款信息";
pub const REPORT_KEY_RISK: &str = "风险分析";
pub const REPORT_KEY_COMPLIANCE: &str = "合规性分析";

/// Accuracy check: five criteria, prose output.
pub const ACCURACY_CHECK_SYSTEM: &str = "\
你是一位严谨的合同审查质量保证专家。请检查生成的合同审查报告
是否准确反映了原始合同的内容。重点检查以下方面：

1. 关键条款提取的准确性
2. 风险评估的合理性
3. 合规性分析的准确性
4. 报告中是否存在事实性错误
5. 建议的相关性和可行性

请提供一份准确性检查报告，指出任何不准确或需要改进的地方，
并给出改进建议。";

/// Accuracy check user prompt pairing the contract with the drafted report.
pub fn accuracy_check_user(original_contract: &str, generated_report: &str) -> String {
    format!(
        "原始合同文本：\n{}\n\n生成的审查报告：\n{}\n\n请对上述审查报告进行准确性检查。",
        original_contract, generated_report
    )
}

/// Join a fixed instruction line and a payload into one user prompt.
pub fn user_prompt(instruction: &str, payload: &str) -> String {
    format!("{}\n\n{}", instruction, payload)
}
