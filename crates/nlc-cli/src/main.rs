//! CLI binary for nlc: generate validated source code from English descriptions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use nlc_core::languages::{Language, TargetKind, output_stem};
use nlc_core::{PromptInputs, build_system_prompt};
use nlc_gen::{
    GeminiProvider, GenerationRequest, SessionConfig, generate_description, run_session,
};

#[derive(Parser, Debug)]
#[command(name = "nlc", about = "Natural-language code generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate code from an English description, with validation and retry
    Generate {
        /// Path to input text description file
        #[arg(long)]
        input_txt: PathBuf,

        /// Path to output code file
        #[arg(long)]
        output_file: PathBuf,

        /// Target programming language: python, java
        #[arg(long, default_value = "python")]
        language: Language,

        /// Whether this target is a library or a binary executable
        #[arg(long, default_value = "library")]
        target_type: TargetKind,

        /// Package used to import the generated file
        #[arg(long)]
        package: String,

        /// Paths to dependency code files (repeatable)
        #[arg(long)]
        dep_file: Vec<PathBuf>,

        /// Paths to documentation files fed to the LLM (repeatable)
        #[arg(long)]
        dep_doc: Vec<PathBuf>,

        /// Paths to Java dependency jar files needed for compilation (repeatable)
        #[arg(long)]
        java_dep_jar: Vec<PathBuf>,

        /// Paths to resource files available to the generated program (repeatable)
        #[arg(long)]
        resource_file: Vec<PathBuf>,

        /// LLM model name (e.g., gemini-2.0-flash-001)
        #[arg(long)]
        llm_model: String,

        /// Sampling temperature (0.0-1.0)
        #[arg(long, default_value = "0.2")]
        temperature: f32,

        /// Maximum output tokens
        #[arg(long, default_value = "8192")]
        max_output_tokens: u32,

        /// Environment variable name for the API key
        #[arg(long, default_value = "LLM_API_KEY")]
        api_key_env_var: String,
    },

    /// Generate a usage description for an existing source file
    Describe {
        /// Path to source code file
        #[arg(long)]
        source_file: PathBuf,

        /// Path to output the usage description
        #[arg(long)]
        output_file: PathBuf,

        /// Path to raw header file to prepend to the output
        #[arg(long)]
        raw_header_file: PathBuf,

        /// LLM model name (e.g., gemini-2.0-flash-001)
        #[arg(long)]
        llm_model: String,

        /// Sampling temperature (0.0-1.0)
        #[arg(long, default_value = "0.2")]
        temperature: f32,

        /// Maximum output tokens
        #[arg(long, default_value = "2048")]
        max_output_tokens: u32,

        /// Environment variable name for the API key
        #[arg(long, default_value = "LLM_API_KEY")]
        api_key_env_var: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input_txt,
            output_file,
            language,
            target_type,
            package,
            dep_file,
            dep_doc,
            java_dep_jar,
            resource_file,
            llm_model,
            temperature,
            max_output_tokens,
            api_key_env_var,
        } => {
            cmd_generate(GenerateArgs {
                input_txt,
                output_file,
                language,
                target_type,
                package,
                dep_file,
                dep_doc,
                java_dep_jar,
                resource_file,
                llm_model,
                temperature,
                max_output_tokens,
                api_key_env_var,
            })
            .await
        }
        Commands::Describe {
            source_file,
            output_file,
            raw_header_file,
            llm_model,
            temperature,
            max_output_tokens,
            api_key_env_var,
        } => {
            cmd_describe(
                &source_file,
                &output_file,
                &raw_header_file,
                &llm_model,
                temperature,
                max_output_tokens,
                &api_key_env_var,
            )
            .await
        }
    }
}

struct GenerateArgs {
    input_txt: PathBuf,
    output_file: PathBuf,
    language: Language,
    target_type: TargetKind,
    package: String,
    dep_file: Vec<PathBuf>,
    dep_doc: Vec<PathBuf>,
    java_dep_jar: Vec<PathBuf>,
    resource_file: Vec<PathBuf>,
    llm_model: String,
    temperature: f32,
    max_output_tokens: u32,
    api_key_env_var: String,
}

async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let english_text = std::fs::read_to_string(&args.input_txt)
        .with_context(|| format!("failed to read {}", args.input_txt.display()))?;

    let inputs = PromptInputs {
        dependencies: read_named_files(&args.dep_file)?,
        docs: read_named_files(&args.dep_doc)?,
        resources: args.resource_file.clone(),
        target: args.target_type,
        output_name: output_stem(&args.output_file),
        package: args.package.clone(),
    };
    let system_prompt = build_system_prompt(args.language, &inputs);

    let api_key = api_key_from_env(&args.api_key_env_var)?;
    let provider = GeminiProvider::new(api_key)?;

    let request = GenerationRequest {
        system_prompt,
        task_description: english_text,
        model: args.llm_model,
        temperature: args.temperature,
        max_output_tokens: args.max_output_tokens,
    };
    let config = SessionConfig {
        language: args.language,
        output_path: &args.output_file,
        package: &args.package,
        dep_jars: &args.java_dep_jar,
        max_attempts: nlc_gen::DEFAULT_MAX_ATTEMPTS,
    };

    let report = run_session(&provider, request, &config).await?;

    tracing::info!("Successfully generated {}", args.output_file.display());
    tracing::info!("Usage stats: {}", report.total_usage);
    Ok(())
}

async fn cmd_describe(
    source_file: &Path,
    output_file: &Path,
    raw_header_file: &Path,
    llm_model: &str,
    temperature: f32,
    max_output_tokens: u32,
    api_key_env_var: &str,
) -> Result<()> {
    let source_code = std::fs::read_to_string(source_file)
        .with_context(|| format!("failed to read {}", source_file.display()))?;
    let raw_header = std::fs::read_to_string(raw_header_file)
        .with_context(|| format!("failed to read {}", raw_header_file.display()))?;

    let api_key = api_key_from_env(api_key_env_var)?;
    let provider = GeminiProvider::new(api_key)?;

    let report = generate_description(
        &provider,
        &source_code,
        &raw_header,
        llm_model,
        temperature,
        max_output_tokens,
    )
    .await?;

    std::fs::write(output_file, &report.formatted)
        .with_context(|| format!("failed to write {}", output_file.display()))?;

    tracing::info!(
        "Successfully generated usage description at {}",
        output_file.display()
    );
    tracing::info!("Usage stats: {}", report.usage);
    Ok(())
}

/// Read each file into a `(path, contents)` pair, preserving argument order.
fn read_named_files(paths: &[PathBuf]) -> Result<Vec<(String, String)>> {
    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), content))
        })
        .collect()
}

fn api_key_from_env(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| anyhow::anyhow!("{var} environment variable not set"))
}
