use anyhow::Result;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use tartil::audio::AudioPreparer;
use tartil::auth::CredentialGate;
use tartil::cli::{Cli, Commands};
use tartil::config::Config;
use tartil::pipeline::{Outcome, Pipeline, PipelineConfig};
use tartil::report::{self, OutputFormat};
use tartil::stages::HfCapabilityFactory;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            run_analyze(
                config,
                cli.audio,
                &cli.output,
                cli.quiet,
                cli.verbose,
                cli.timeout,
            )
            .await?;
        }
        Some(Commands::Check) => {
            let config = load_config(cli.config.as_deref())?;
            run_check(&config);
        }
        Some(Commands::Abjad { text }) => {
            run_abjad(&text);
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "tartil", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/tartil/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// Run the analysis pipeline and print the report.
async fn run_analyze(
    config: Config,
    audio: Option<PathBuf>,
    output: &str,
    quiet: bool,
    verbosity: u8,
    timeout: Option<u64>,
) -> Result<()> {
    let format: OutputFormat = output.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let gate = CredentialGate::from_config(&config.auth);
    let mut factory = HfCapabilityFactory::from_config(&config);
    if let Some(secs) = timeout {
        factory = factory.with_timeout(std::time::Duration::from_secs(secs));
    }
    let preparer = AudioPreparer::new().with_quiet(quiet);
    let pipeline = Pipeline::new(
        PipelineConfig { quiet, verbosity },
        gate,
        preparer,
        Arc::new(factory),
    );

    let reference = audio.unwrap_or_else(|| {
        let sample = config.audio.sample_path.clone();
        if !quiet {
            eprintln!("tartil: no audio file given, using '{}'", sample.display());
        }
        sample
    });

    match pipeline.run(&reference).await? {
        Outcome::Completed(result) => match format {
            OutputFormat::Json => println!("{}", report::render_json(&result)?),
            OutputFormat::Text => report::print_text(&result),
        },
        Outcome::Aborted(reason) => {
            eprintln!("{}", format!("Analysis aborted: {}", reason).red());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Report credential availability and the effective configuration.
fn run_check(config: &Config) {
    let gate = CredentialGate::from_config(&config.auth);
    match gate.resolve() {
        Some((_, source)) => {
            println!("{} API token available via {}", "ok".green(), source);
        }
        None => {
            println!("{} no API token found", "missing".red());
            println!(
                "  Set {} or write the token to {}",
                tartil::defaults::TOKEN_ENV_VAR,
                CredentialGate::default_token_file().display()
            );
        }
    }

    println!("Endpoint: {}", config.api.endpoint);
    println!("Models:");
    println!("  {} {}", "transcription:".dimmed(), config.models.transcription);
    println!("  {} {}", "position:     ".dimmed(), config.models.position);
    println!("  {} {}", "tajweed:      ".dimmed(), config.models.tajweed);
    println!("  {} {}", "scoring:      ".dimmed(), config.models.scoring);
}

/// Compute and print the Abjad value of a text.
fn run_abjad(text: &str) {
    println!("Abjad value: {}", tartil::abjad::value(text));
    if tartil::abjad::validate_bismillah(text) {
        println!("{}", "Bismillah: valid (786)".green());
    }
}
