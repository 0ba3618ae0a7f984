//! CLI entrypoint for dilemma-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use dilemma_application::{
    CredentialResolver, EvaluateUseCase, EvaluationConfig, GenerateScenarioUseCase,
    ProviderAdapter,
};
use dilemma_infrastructure::{
    CachedCredentialResolver, ConfigLoader, EnvCredentialResolver, FileConfig, build_adapters,
    http_client,
};
use dilemma_presentation::{
    AppState, BasicAuth, Cli, Command, ConsoleFormatter, EvalArgs, OutputFormat,
    ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Everything the use cases are built from
struct Wiring {
    config: EvaluationConfig,
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    credentials: Arc<dyn CredentialResolver>,
}

impl Wiring {
    fn new(file_config: &FileConfig, mock_override: bool) -> Result<Self> {
        let mut config = file_config.to_evaluation_config();
        if mock_override {
            config = config.with_mock_mode(true);
        }

        let client = http_client(Duration::from_secs(file_config.timeout_seconds))?;
        let adapters = build_adapters(&client, &file_config.providers);
        let credentials: Arc<dyn CredentialResolver> = Arc::new(
            CachedCredentialResolver::with_default_ttl(Arc::new(EnvCredentialResolver)),
        );

        Ok(Self {
            config,
            adapters,
            credentials,
        })
    }

    fn evaluate(&self) -> EvaluateUseCase {
        self.adapters.iter().fold(
            EvaluateUseCase::new(self.config.clone(), self.credentials.clone()),
            |use_case, adapter| use_case.with_adapter(adapter.clone()),
        )
    }

    fn generate(&self) -> GenerateScenarioUseCase {
        self.adapters.iter().fold(
            GenerateScenarioUseCase::new(self.config.clone(), self.credentials.clone()),
            |use_case, adapter| use_case.with_adapter(adapter.clone()),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    file_config.validate()?;

    info!("Starting dilemma-panel");

    match cli.command {
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
        Some(Command::Cases) => {
            println!("{}", ConsoleFormatter::format_catalog());
            Ok(())
        }
        Some(Command::Eval(args)) => {
            let wiring = Wiring::new(&file_config, args.mock)?;
            run_eval(&wiring, &args, cli.quiet).await
        }
        Some(Command::Generate { output, mock }) => {
            let wiring = Wiring::new(&file_config, mock)?;
            let proposal = wiring.generate().execute().await;
            match output {
                OutputFormat::Full => println!("{}", ConsoleFormatter::format_scenario(&proposal)),
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&proposal)),
            }
            Ok(())
        }
        Some(Command::Serve { bind, mock }) => {
            let wiring = Wiring::new(&file_config, mock)?;
            let bind = bind.unwrap_or_else(|| file_config.server.bind.clone());
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address: {}", bind))?;

            if wiring.config.mock_mode {
                info!("Mock mode enabled: providers will not be called");
            }
            let basic_auth = &file_config.server.basic_auth;
            let state = AppState::new(wiring.evaluate(), wiring.generate()).with_basic_auth(
                BasicAuth::new(
                    &basic_auth.user_env,
                    &basic_auth.password_env,
                    wiring.credentials.clone(),
                ),
            );
            dilemma_presentation::serve(state, addr).await?;
            Ok(())
        }
    }
}

async fn run_eval(wiring: &Wiring, args: &EvalArgs, quiet: bool) -> Result<()> {
    let input = args.to_input();
    let show_progress = !quiet && args.output == OutputFormat::Full;

    // Print header
    if show_progress {
        println!();
        println!("+============================================================+");
        println!("|           dilemma-panel - Thought Experiment               |");
        println!("+============================================================+");
        println!();
        println!("Case: {}  Principle: {}", input.case_id, input.principle_id);
        println!();
    }

    let use_case = wiring.evaluate();

    // Execute with or without progress reporting
    let response = if !show_progress || wiring.config.mock_mode {
        use_case.execute(input).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        // No bar when piped
        use_case.execute_with_progress(input, &SimpleProgress).await?
    };

    // Output results
    let output = match args.output {
        OutputFormat::Full => ConsoleFormatter::format_evaluation(&response),
        OutputFormat::Json => ConsoleFormatter::format_json(&response),
    };

    println!("{}", output);

    Ok(())
}
