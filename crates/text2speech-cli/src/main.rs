//! Text2Speech CLI - Translate text and speak the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;
use text2speech_core::{
    AppConfig, Error, Lang, SpeechPipeline, Stage, TranslationMethod, language, source_languages,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "text2speech")]
#[command(author, version, about = "Translate text and generate speech", long_about = None)]
struct Args {
    /// Text to translate (read from stdin when omitted)
    text: Option<String>,

    /// Source language code or name, or "auto" to detect it
    #[arg(short = 's', long)]
    source: Option<String>,

    /// Target language code or name
    #[arg(short = 't', long)]
    target: Option<String>,

    /// Translation method: neural-pairwise or generic-service
    #[arg(short = 'm', long)]
    method: Option<String>,

    /// Output audio file (default: translation-<target>.mp3)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only print the translation
    #[arg(long)]
    no_audio: bool,

    /// Speak slowly
    #[arg(long)]
    slow: bool,

    /// Only detect the source language
    #[arg(long)]
    detect_only: bool,

    /// List supported languages and exit
    #[arg(long)]
    list_languages: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Hugging Face API token for the neural models
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,

    /// Pivot language for chained neural translation
    #[arg(long)]
    pivot: Option<String>,
}

/// Resolve a language given by code or by name.
fn parse_lang(input: &str) -> Result<Lang> {
    language::lookup(input).with_context(|| format!("Unknown language: {input}"))
}

fn read_text(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No text given, pass it as an argument or pipe it through stdin");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(text)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One-line report of a failed request, naming the stage that failed.
fn failure_message(err: &Error) -> String {
    match err.stage() {
        Some(Stage::Synthesis) => format!("An error occurred during audio generation: {err}"),
        _ if err.is_request_error() => err.to_string(),
        _ => format!("An error occurred during translation: {err}"),
    }
}

// CLI output is intentional
#[allow(clippy::print_stdout)]
fn print_languages() {
    for option in source_languages() {
        println!("{:<8} {}", option.code, option.name);
    }
}

#[tokio::main]
#[allow(clippy::print_stdout, clippy::print_stderr)]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    if args.list_languages {
        print_languages();
        return Ok(());
    }

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    if let Some(source) = &args.source {
        config.source_lang = parse_lang(source)?;
    }
    if let Some(target) = &args.target {
        config.target_lang = parse_lang(target)?;
    }
    if let Some(method) = &args.method {
        config.method = method.parse::<TranslationMethod>()?;
    }
    if let Some(pivot) = &args.pivot {
        config.neural.pivot_lang = parse_lang(pivot)?;
    }
    if args.hf_token.is_some() {
        config.neural.api_token = args.hf_token.clone();
    }
    if args.slow {
        config.speech.slow = true;
    }

    let text = read_text(args.text)?;
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Please enter some text to translate");
    }

    let pipeline = SpeechPipeline::new(config.clone()).context("Failed to initialize pipeline")?;

    // Resolve the source language up front so it can be shown
    let source = if config.source_lang.is_auto() {
        let Some(detected) = pipeline.detect_language(text) else {
            eprintln!("Unable to detect language. Please select the source language manually.");
            std::process::exit(1);
        };
        println!(
            "Detected source language: {}",
            language::language_name(detected.as_str()).unwrap_or(detected.as_str())
        );
        detected
    } else {
        config.source_lang.clone()
    };

    if args.detect_only {
        return Ok(());
    }

    let target = config.target_lang.clone();
    info!("Translating {} -> {} with {}", source, target, config.method);

    if args.no_audio {
        let pb = spinner("Translating...");
        let translation = match pipeline.prepare(text, &source, &target, config.method) {
            Ok((request, _)) => pipeline.translate(&request).await,
            Err(e) => Err(e),
        };
        pb.finish_and_clear();

        match translation {
            Ok(translation) => println!("{}", translation.text),
            Err(e) => {
                eprintln!("{}", failure_message(&e));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Nothing is printed until translation and audio both succeeded
    let pb = spinner("Translating and generating audio...");
    let output = pipeline.run(text, &source, &target, config.method).await;
    pb.finish_and_clear();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            std::process::exit(1);
        }
    };

    if output.translation.fell_back {
        info!("Neural translation unavailable, used {}", pipeline.orchestrator().generic_name());
    }

    // Determine output path
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("translation-{target}.mp3")));

    std::fs::write(&output_path, &output.audio)
        .context(format!("Failed to write output: {}", output_path.display()))?;

    println!("{}", output.translation.text);
    println!("Audio saved to: {}", output_path.display());

    Ok(())
}
