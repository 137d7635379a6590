// Citation CLI
//
// Reads saved HTML pages, classifies each one and prints a YAML
// bibliography on stdout. Pages run concurrently on blocking tasks.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use kodegen_tools_citation::{
    Citation, CitationPipeline, default_config_path, load_yaml_config, to_yaml,
};

#[derive(Debug, Parser)]
#[command(name = "kodegen-citation", version, about = "Generate citations from HTML pages")]
struct Cli {
    /// Config file (defaults to <config dir>/kodegen/citation.yaml)
    #[arg(long, env = "KODEGEN_CITATION_CONFIG")]
    config: Option<PathBuf>,

    /// Page URL for a single input
    #[arg(long)]
    url: Option<String>,

    /// HTML inputs as FILE or FILE=URL; `-` reads stdin
    #[arg(required = true)]
    inputs: Vec<String>,
}

/// One page to process
#[derive(Debug)]
struct PageInput {
    label: String,
    path: String,
    url: String,
}

fn resolve_inputs(cli: &Cli) -> Result<Vec<PageInput>> {
    cli.inputs
        .iter()
        .map(|input| {
            let (path, url) = match input.split_once('=') {
                Some((path, url)) => (path.to_string(), url.to_string()),
                None => match (&cli.url, cli.inputs.len()) {
                    (Some(url), 1) => (input.clone(), url.clone()),
                    (Some(_), _) => {
                        bail!("--url applies to a single input; use FILE=URL for {input}")
                    }
                    (None, _) => bail!("No URL for {input}; pass --url or FILE=URL"),
                },
            };
            Ok(PageInput {
                label: input.clone(),
                path,
                url,
            })
        })
        .collect()
}

async fn read_page(path: &str) -> Result<String> {
    if path == "-" {
        let mut dom = String::new();
        tokio::io::stdin()
            .read_to_string(&mut dom)
            .await
            .context("Failed to read stdin")?;
        Ok(dom)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {path}"))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when at least one page failed
async fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config.clone().or_else(default_config_path);
    let config = match &config_path {
        Some(path) => load_yaml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Default::default(),
    };
    let pipeline = CitationPipeline::new(config);

    let inputs = resolve_inputs(&cli)?;
    let mut tasks = Vec::with_capacity(inputs.len());
    for input in inputs {
        let dom = read_page(&input.path).await?;
        let pipeline = pipeline.clone();
        let handle = tokio::task::spawn_blocking(move || pipeline.run(&dom, &input.url));
        tasks.push((input.label, handle));
    }

    let mut citations: Vec<Citation> = Vec::new();
    let mut all_ok = true;
    for (label, handle) in tasks {
        match handle.await {
            Ok(Ok(citation)) => {
                info!("{}: {} '{}'", label, citation.entry_type(), citation.title());
                citations.push(citation);
            }
            Ok(Err(e)) => {
                error!("{}: {}", label, e);
                all_ok = false;
            }
            Err(e) => {
                error!("{}: task failed: {}", label, e);
                all_ok = false;
            }
        }
    }

    if !citations.is_empty() {
        print!("{}", to_yaml(&citations)?);
    }
    Ok(all_ok)
}
