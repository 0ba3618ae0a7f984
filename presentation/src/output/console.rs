//! Console output formatter for evaluation results

use colored::Colorize;
use dilemma_domain::{
    Decision, EvaluationResponse, ModelResult, Principle, ProviderId, ScenarioProposal,
    ThoughtCase,
};
use serde::Serialize;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a complete evaluation
    pub fn format_evaluation(response: &EvaluationResponse) -> String {
        let input = &response.input_echo;
        let mut output = String::new();

        output.push_str(&Self::header("Thought Experiment Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Case:".cyan().bold(),
            ThoughtCase::find(&input.case_id)
                .map(|c| c.title)
                .unwrap_or(input.case_id.as_str())
        ));
        output.push_str(&format!("{} {}\n", "Scenario:".cyan().bold(), input.scenario_text));
        output.push_str(&format!("  A: {}\n  B: {}\n", input.option_a, input.option_b));
        output.push_str(&format!(
            "{} {}\n",
            "Principle:".cyan().bold(),
            input.principle_id.label()
        ));
        if !input.if_conditions.is_empty() {
            output.push_str(&format!("{}\n", "If:".cyan().bold()));
            for condition in &input.if_conditions {
                output.push_str(&format!("  * {}\n", condition));
            }
        }
        output.push_str(&format!(
            "{} {}\n",
            "Target confidence:".cyan().bold(),
            input.target_confidence
        ));

        output.push_str(&Self::section_header("Decisions"));
        let enabled = input.enabled_providers();
        for (provider, result) in response.results.iter().filter(|(p, _)| enabled.contains(p)) {
            let error = response.errors.as_ref().and_then(|e| e.get(provider));
            output.push_str(&Self::format_result(*provider, result, error.map(String::as_str)));
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_result(provider: ProviderId, result: &ModelResult, error: Option<&str>) -> String {
        let title = format!("── {} ──", provider.display_name());
        let title = if error.is_some() {
            title.red().bold()
        } else {
            title.yellow().bold()
        };

        let decision = match result.decision {
            Decision::A => "A".green().bold(),
            Decision::B => "B".magenta().bold(),
        };

        let mut output = format!(
            "\n{}\n{} {}  {} {}\n{}\n",
            title,
            "Decision:".bold(),
            decision,
            "Confidence:".bold(),
            result.confidence,
            result.reasoning_summary
        );
        for assumption in &result.key_assumptions {
            output.push_str(&format!("  * {}\n", assumption));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Changed by if:".dimmed(),
            result.what_changed_by_if
        ));
        if let Some(error) = error {
            output.push_str(&format!("{} {}\n", "Error:".red(), error));
        }
        output
    }

    /// Format a proposed scenario
    pub fn format_scenario(proposal: &ScenarioProposal) -> String {
        let mut output = format!("{}\n{}\n", "Scenario:".cyan().bold(), proposal.scenario_text);
        for (label, option) in ["A", "B"].iter().zip(&proposal.options) {
            output.push_str(&format!("  {}: {}\n", label.bold(), option));
        }
        if let Some(error) = &proposal.error {
            output.push_str(&format!("{} {}\n", "Fallback:".yellow(), error));
        }
        output
    }

    /// List the built-in cases and principles
    pub fn format_catalog() -> String {
        let mut output = Self::section_header("Cases");
        for case in ThoughtCase::all() {
            output.push_str(&format!("  {:<10} {}\n", case.id.bold(), case.title));
        }
        output.push_str(&Self::section_header("Principles"));
        for principle in Principle::ALL {
            output.push_str(&format!(
                "  {:<20} {}\n",
                principle.id().bold(),
                principle.label()
            ));
        }
        output
    }

    /// Format as JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
