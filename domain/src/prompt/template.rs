//! Prompt templates for evaluation and scenario generation

use crate::experiment::principle::Principle;
use crate::result::model_result::FIRST_RUN;

/// Corrective line appended to the user prompt on the second attempt
pub const RETRY_NOTE: &str = "JSON以外の出力は禁止です。指定JSONのみ返してください。";

/// Case details and request parameters rendered into the user prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPromptArgs<'a> {
    pub case_title: &'a str,
    pub scenario_text: &'a str,
    pub option_a: &'a str,
    pub option_b: &'a str,
    pub principle: Principle,
    pub if_conditions: &'a [String],
    pub target_confidence: i64,
}

/// Templates for generating prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for evaluating a thought experiment
    pub fn system_prompt() -> &'static str {
        concat!(
            "あなたは思考実験に対して二択(A/B)を選び、確信度(51-100整数)を返す。\n",
            "確信度は正解率ではなく、その選択の妥当性に対する迷いの少なさ。\n",
            "出力は必ず指定JSONのみ。余計な文章は禁止。\n",
            "日本語で簡潔に。reasoning_summaryは1文、key_assumptionsは最大3つ。\n",
            "if条件が無い場合は what_changed_by_if を『初回』とする。"
        )
    }

    /// User prompt for evaluating a thought experiment.
    ///
    /// A non-empty `retry_note` is appended verbatim as the last line.
    pub fn user_prompt(args: &UserPromptArgs<'_>, retry_note: Option<&str>) -> String {
        let principle_lines = Principle::ALL
            .iter()
            .map(|p| format!("- {}: {} (id: {})", p.label(), p.description(), p.id()))
            .collect::<Vec<_>>()
            .join("\n");

        // serde_json never fails on a slice of strings
        let if_array = serde_json::to_string(args.if_conditions).unwrap_or_else(|_| "[]".into());

        let example = serde_json::json!({
            "decision": "A",
            "confidence": 80,
            "key_assumptions": ["例"],
            "reasoning_summary": "1文で要約。",
            "what_changed_by_if": FIRST_RUN
        });

        let mut lines = vec![
            format!("ケース名: {}", args.case_title),
            format!("シナリオ: {}", args.scenario_text),
            format!("選択肢A: {}", args.option_a),
            format!("選択肢B: {}", args.option_b),
            "判断原理一覧:".to_string(),
            principle_lines,
            format!("選択した判断原理: {}", args.principle.label()),
            format!("if条件(配列): {}", if_array),
            format!("目標確信度: {}", args.target_confidence),
            "出力JSONの形式は以下。余計な文は不要:".to_string(),
            example.to_string(),
        ];

        if let Some(note) = retry_note.filter(|n| !n.is_empty()) {
            lines.push(note.to_string());
        }

        lines.join("\n")
    }

    /// System prompt for generating a new thought experiment
    pub fn scenario_system_prompt() -> &'static str {
        concat!(
            "あなたは二択の思考実験を日本語で生成する。\n",
            "出力は必ず指定JSONのみ。余計な文章は禁止。\n",
            "scenarioTextは1〜2文で簡潔に。\n",
            "optionsは短いフレーズの配列。\n",
            "A/Bのラベルは含めない。"
        )
    }

    /// User prompt for generating a new thought experiment
    pub fn scenario_user_prompt() -> String {
        let example = serde_json::json!({
            "scenarioText": "例: ...",
            "options": ["例: ...", "例: ..."]
        });
        [
            "二択の思考実験を1件生成してください。".to_string(),
            "道徳・公平・リスク・ケアなどのテーマをバランスよく。".to_string(),
            "出力JSONの形式:".to_string(),
            example.to_string(),
        ]
        .join("\n")
    }
}
