//! Formdesk CLI
//!
//! Build forms, fill them out, and edit submitted responses from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! formdesk form create --title "Signup" --field "Name:text" --field "Age:number"
//! formdesk form show 3f2a...
//! formdesk respond 3f2a... --answer "Name=Alice" --answer "Age=30"
//! formdesk response edit --link "https://forms.example.com/forms/3f2a.../response/r1/edit?token=..."
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;
mod prompt;

#[derive(Parser)]
#[command(name = "formdesk")]
#[command(version)]
#[command(about = "Formdesk Command Line Interface", long_about = None)]
struct Cli {
    /// Forms API base URL
    #[arg(long, env = "FORMDESK_API_URL")]
    api_url: Option<String>,

    /// Public app URL that edit links point at
    #[arg(long, env = "FORMDESK_APP_URL")]
    app_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and inspect forms
    Form {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Fill out a form and submit a new response
    Respond {
        /// Form id
        form_id: String,
        /// Answer as `Label=value`; repeatable
        #[arg(long = "answer", short = 'a')]
        answers: Vec<String>,
        /// Prompt for each field
        #[arg(long, short)]
        interactive: bool,
    },
    /// View or edit a submitted response
    Response {
        #[command(subcommand)]
        action: ResponseCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// Create a new form
    Create {
        #[arg(long)]
        title: Option<String>,
        /// Field as `Label:type` (text, number, date, email, textarea); repeatable
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },
    /// Show a form's fields
    Show { id: String },
    /// Change an existing form
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Append a field as `Label:type`
        #[arg(long = "add-field")]
        add: Vec<String>,
        /// Remove the field with this label
        #[arg(long = "remove-field")]
        remove: Vec<String>,
        /// Change a field's type, as `Label:type`
        #[arg(long = "retype")]
        retype: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ResponseCommands {
    /// Show a stored response
    Show {
        form_id: String,
        response_id: String,
        #[arg(long)]
        token: String,
    },
    /// Edit a stored response
    Edit {
        #[arg(required_unless_present = "link")]
        form_id: Option<String>,
        #[arg(required_unless_present = "link")]
        response_id: Option<String>,
        #[arg(long, required_unless_present = "link")]
        token: Option<String>,
        /// Edit link issued at submission
        #[arg(long, conflicts_with_all = ["form_id", "response_id", "token"])]
        link: Option<String>,
        /// Answer as `Label=value`; repeatable
        #[arg(long = "answer", short = 'a')]
        answers: Vec<String>,
        /// Prompt for each field
        #[arg(long, short)]
        interactive: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let profile = match config::Config::load(cli.profile.as_deref()) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Ignoring unreadable config: {}", e);
            config::Config::default()
        }
    };
    let format = cli
        .format
        .or_else(|| profile.default_format.as_deref().and_then(output::OutputFormat::parse))
        .unwrap_or(output::OutputFormat::Table);
    let settings = commands::Settings {
        api_url: cli.api_url.or(profile.api_url.clone()),
        app_url: cli.app_url.or(profile.app_url.clone()),
        timeout_secs: profile.timeout_secs,
    };

    let result = match cli.command {
        Commands::Form { action } => commands::forms::handle(action, &settings, format).await,
        Commands::Respond {
            form_id,
            answers,
            interactive,
        } => commands::responses::respond(&form_id, &answers, interactive, &settings).await,
        Commands::Response { action } => {
            commands::responses::handle(action, &settings, format).await
        }
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}
