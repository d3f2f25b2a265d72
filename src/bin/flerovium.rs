//! Flerovium command line
//!
//! Runs one interaction, or a whole scenario file, against a browser and
//! prints the tool results as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use flerovium::inference::DEFAULT_BASE_URL;
use flerovium::tools::{ToolContext, ToolRegistry};
use flerovium::{
    BrowserSession, ConnectionOptions, InferenceClient, InferenceConfig, LaunchOptions, PipelineOptions, Scenario,
    VisionPage,
};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "flerovium", version, about = "Drive a browser by what its pages look like")]
struct Cli {
    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Attach to a running browser instead of launching one
    #[arg(long, value_name = "WS_URL")]
    ws_url: Option<String>,

    /// Base URL of the inference service
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    inference_url: String,

    /// Inference request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Directory for screenshots
    #[arg(long, value_name = "DIR", default_value = "data")]
    screenshot_dir: PathBuf,

    /// Also write screenshots with the resolved target drawn on them
    #[arg(long)]
    annotate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Click the element with a label
    Click {
        /// Page to open first
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        label: String,

        /// Detection and classification workflow id
        #[arg(long)]
        model: String,

        /// The target is an input rather than a button
        #[arg(long)]
        input: bool,
    },

    /// Type into the form field with a role
    Fill {
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        label: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        text: String,
    },

    /// Extract the most confident detected table from the DOM
    Table {
        #[arg(long)]
        url: Option<String>,

        /// Table detection model id
        #[arg(long)]
        model: String,

        #[arg(long, default_value = "table")]
        label: String,
    },

    /// Recognize a table from the screenshot alone
    Recognize {
        #[arg(long)]
        url: Option<String>,

        #[arg(long, default_value = "table")]
        label: String,
    },

    /// Run a scenario file
    Run { scenario: PathBuf },

    /// List available tools and their parameter schemas
    Tools,
}

impl Command {
    fn into_scenario(self) -> anyhow::Result<Scenario> {
        let (url, scenario) = match self {
            Command::Click { url, label, model, input } => {
                let kind = if input { "input" } else { "button" };
                (url, Scenario::new("click").step("click_label", json!({"label": label, "model": model, "kind": kind})))
            }
            Command::Fill { url, label, model, text } => {
                (url, Scenario::new("fill").step("fill_field", json!({"label": label, "model": model, "text": text})))
            }
            Command::Table { url, model, label } => {
                (url, Scenario::new("table").step("extract_table", json!({"model": model, "label": label})))
            }
            Command::Recognize { url, label } => {
                (url, Scenario::new("recognize").step("recognize_table", json!({"label": label})))
            }
            Command::Run { scenario } => {
                let loaded = Scenario::load(&scenario)
                    .with_context(|| format!("Failed to load scenario {}", scenario.display()))?;
                return Ok(loaded);
            }
            Command::Tools => anyhow::bail!("tools does not run a scenario"),
        };

        Ok(match url {
            Some(url) => {
                let mut with_navigation = Scenario::new(scenario.name.clone()).step("navigate", json!({"url": url}));
                with_navigation.steps.extend(scenario.steps);
                with_navigation
            }
            None => scenario,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let registry = ToolRegistry::with_defaults();

    if let Command::Tools = cli.command {
        let tools: Vec<_> = registry
            .names()
            .into_iter()
            .filter_map(|name| registry.get(name))
            .map(|tool| json!({"name": tool.name(), "description": tool.description(), "parameters": tool.parameters_schema()}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let scenario = cli.command.clone().into_scenario()?;

    let session = match &cli.ws_url {
        Some(ws_url) => BrowserSession::connect(ConnectionOptions::new(ws_url))?,
        None => BrowserSession::launch(LaunchOptions::new().headless(!cli.headed))?,
    };

    let inference = InferenceClient::new(
        InferenceConfig::new().base_url(&cli.inference_url).timeout(Duration::from_secs(cli.timeout)),
    )?;

    let options = PipelineOptions::new().screenshot_dir(&cli.screenshot_dir).annotate_screenshots(cli.annotate);
    let mut page = VisionPage::new(&session, &inference).with_options(options);
    let mut context = ToolContext::new(&mut page);

    let outcomes = scenario.run(&registry, &mut context)?;
    println!("{}", serde_json::to_string_pretty(&outcomes)?);

    Ok(())
}
