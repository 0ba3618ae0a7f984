//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use dilemma_domain::{Principle, ProviderId, ThoughtCase, ThoughtExperimentInput};
use std::path::PathBuf;

/// Output format for evaluation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted per-provider summary
    Full,
    /// Raw JSON response body
    Json,
}

/// CLI arguments for dilemma-panel
#[derive(Parser, Debug)]
#[command(name = "dilemma-panel")]
#[command(author, version, about = "Pose ethical thought experiments to several LLMs and compare")]
#[command(long_about = r#"
dilemma-panel poses a binary thought experiment to OpenAI, Gemini and
Claude (via Bedrock) in parallel, under a chosen ethical principle and up
to two "if" conditions, and compares their decisions and confidence.

Configuration files are loaded from (in priority order):
1. DILEMMA_* environment variables
2. --config <path>     Explicit config file
3. ./dilemma.toml      Project-level config
4. ~/.config/dilemma-panel/config.toml   Global config

Example:
  dilemma-panel eval --case trolley --principle utilitarian
  dilemma-panel eval --case trolley --if "1人は子ども" --confidence 70 -m gpt -m claude
  dilemma-panel serve --bind 0.0.0.0:3000
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a thought experiment across providers
    Eval(EvalArgs),

    /// Propose a new thought experiment
    Generate {
        /// Output format
        #[arg(short, long, value_enum, default_value = "full")]
        output: OutputFormat,

        /// Use the built-in scenario pool instead of calling a provider
        #[arg(long)]
        mock: bool,
    },

    /// Run the HTTP API server
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Answer with mock results instead of calling providers
        #[arg(long)]
        mock: bool,
    },

    /// List the built-in cases and principles
    Cases,
}

#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Case id: trolley, theseus or custom
    #[arg(long = "case", default_value = "trolley")]
    pub case_id: String,

    /// Ethical principle to apply
    #[arg(short, long, default_value = "none")]
    pub principle: Principle,

    /// Conditional modifier (at most two)
    #[arg(long = "if", value_name = "CONDITION")]
    pub if_conditions: Vec<String>,

    /// Target confidence (51-100)
    #[arg(short, long, default_value_t = 80)]
    pub confidence: i64,

    /// Providers to ask (default: all)
    #[arg(short, long = "model", value_name = "PROVIDER")]
    pub models: Vec<ProviderId>,

    /// Scenario text (required for the custom case)
    #[arg(long)]
    pub scenario: Option<String>,

    /// Text of option A
    #[arg(long)]
    pub option_a: Option<String>,

    /// Text of option B
    #[arg(long)]
    pub option_b: Option<String>,

    /// Answer with mock results instead of calling providers
    #[arg(long)]
    pub mock: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,
}

impl EvalArgs {
    /// Build the request, filling unspecified texts from the case catalog.
    ///
    /// Validation is left to the use case so CLI and HTTP report alike.
    pub fn to_input(&self) -> ThoughtExperimentInput {
        let case = ThoughtCase::find(&self.case_id);
        let pick = |given: &Option<String>, from_case: fn(&ThoughtCase) -> &'static str| {
            given
                .clone()
                .or_else(|| case.map(|c| from_case(c).to_string()))
                .unwrap_or_default()
        };

        ThoughtExperimentInput {
            case_id: self.case_id.clone(),
            principle_id: self.principle,
            if_conditions: self.if_conditions.clone(),
            target_confidence: self.confidence,
            scenario_text: pick(&self.scenario, |c| c.scenario_text),
            option_a: pick(&self.option_a, |c| c.option_a),
            option_b: pick(&self.option_b, |c| c.option_b),
            enabled_models: (!self.models.is_empty()).then(|| self.models.clone()),
        }
    }
}
