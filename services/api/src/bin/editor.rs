//! services/api/src/bin/editor.rs
//!
//! Command-line editor. Runs an `EditorSession` against a newsroom server, so
//! every edit goes through the same path, scale and save rules as the web editor.

use anyhow::{anyhow, bail, Context};
use api_lib::client::NewsroomClient;
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use newsroom_core::domain::{GeneratedContent, PublicationType, ThemeType};
use newsroom_core::ports::IssueRepository;
use newsroom_core::session::EditorSession;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Newsroom editor - generate, edit and publish newspaper issues
#[derive(Parser, Debug)]
#[command(name = "newsroom-editor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the newsroom server
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Publication to edit (TRIANGLE, DUSKVOL, ADVENTURER)
    #[arg(short, long, default_value = "TRIANGLE")]
    publication: PublicationType,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List this publication's issues, newest first
    List,

    /// Print the latest issue as JSON
    Latest {
        /// Consider every publication, not just the selected one
        #[arg(long)]
        any: bool,
    },

    /// Start from the publication's blank template
    Blank(PersistArgs),

    /// Generate a new issue about a topic
    Generate {
        #[arg(short, long)]
        topic: String,

        /// Issue date, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Visual theme (defaults to the publication's theme)
        #[arg(long)]
        theme: Option<ThemeType>,

        /// Do not wait for the main image
        #[arg(long)]
        no_image: bool,

        #[command(flatten)]
        persist: PersistArgs,
    },

    /// Edit fields of a stored issue
    Edit {
        /// Issue id
        id: String,

        /// Set a text field, e.g. `frontPage.headline=New title`
        #[arg(long = "set", value_name = "PATH=TEXT")]
        set: Vec<String>,

        /// Set a field from raw JSON, e.g. `frontPage.column1={"title":"a","content":"b"}`
        #[arg(long = "set-json", value_name = "PATH=JSON")]
        set_json: Vec<String>,

        /// Scale a section's font, e.g. `frontPage.mainStory=1.2`
        #[arg(long = "scale", value_name = "PATH=FACTOR")]
        scale: Vec<String>,

        #[command(flatten)]
        persist: PersistArgs,
    },

    /// Rewrite one text field of a stored issue with AI
    Rewrite {
        /// Issue id
        id: String,

        /// Field to rewrite, e.g. `secondPage.editorial.content`
        #[arg(long)]
        path: String,

        /// What to change
        #[arg(short, long)]
        instruction: String,

        #[command(flatten)]
        persist: PersistArgs,
    },

    /// Replace the main image of a stored issue with a local file
    UploadImage {
        /// Issue id
        id: String,

        file: PathBuf,

        /// Mime type; sniffed from the file when omitted
        #[arg(long)]
        mime: Option<String>,

        #[command(flatten)]
        persist: PersistArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PersistArgs {
    /// Save the result as a draft
    #[arg(long, conflicts_with = "publish")]
    draft: bool,

    /// Publish the result
    #[arg(long)]
    publish: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = Arc::new(NewsroomClient::new(&cli.server));
    let session = EditorSession::new(cli.publication, client.clone(), client.clone());
    session.init().await;

    match cli.command {
        Command::List => {
            let issues = session.all_issues();
            if issues.is_empty() {
                println!("{}", session.config().empty_state_text);
            }
            for issue in issues {
                println!(
                    "{}\t{}\t{}\t{}",
                    issue.id.as_deref().unwrap_or("-"),
                    issue.status.map(|s| s.as_str()).unwrap_or("-"),
                    issue
                        .published_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string()),
                    issue.text_data.front_page.headline
                );
            }
        }
        Command::Latest { any } => {
            let filter = (!any).then_some(cli.publication);
            let latest = client.latest(filter).await?;
            println!("{}", serde_json::to_string_pretty(&latest)?);
        }
        Command::Blank(persist) => {
            session.set_date(Local::now().date_naive());
            session.create_blank_from_config();
            finish(&session, persist).await?;
        }
        Command::Generate {
            topic,
            date,
            theme,
            no_image,
            persist,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let theme = theme.unwrap_or(session.config().default_theme);
            if session.generate(&topic, date, Some(theme)).await.is_none() {
                let reason = session
                    .gateway_status()
                    .error
                    .unwrap_or_else(|| "unknown error".to_string());
                bail!("Generation failed: {}", reason);
            }
            if !no_image {
                session.wait_for_image().await;
            }
            finish(&session, persist).await?;
        }
        Command::Edit {
            id,
            set,
            set_json,
            scale,
            persist,
        } => {
            select(&session, &id)?;
            for entry in set {
                let (path, text) = split_assignment(&entry)?;
                apply(&session, path, Value::String(text.to_string()))?;
            }
            for entry in set_json {
                let (path, raw) = split_assignment(&entry)?;
                let value: Value = serde_json::from_str(raw)
                    .with_context(|| format!("Invalid JSON for {}", path))?;
                apply(&session, path, value)?;
            }
            for entry in scale {
                let (path, factor) = split_assignment(&entry)?;
                let factor: f64 = factor
                    .parse()
                    .with_context(|| format!("Invalid scale for {}", path))?;
                session.select_section(path, path);
                if !session.update_scale(factor) {
                    bail!("Cannot scale {}", path);
                }
            }
            finish(&session, persist).await?;
        }
        Command::Rewrite {
            id,
            path,
            instruction,
            persist,
        } => {
            select(&session, &id)?;
            let current = match session.get_value(&path) {
                Value::String(text) => text,
                other => bail!("{} is not a text field: {}", path, other),
            };
            session.select_section(&path, &path);
            session.set_rewrite_prompt(&instruction);
            let rewritten = session.smart_rewrite(&current).await;
            if rewritten == current {
                eprintln!("Text unchanged");
            }
            apply(&session, &path, Value::String(rewritten))?;
            finish(&session, persist).await?;
        }
        Command::UploadImage {
            id,
            file,
            mime,
            persist,
        } => {
            select(&session, &id)?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Cannot read {}", file.display()))?;
            if !session.upload_image(Bytes::from(bytes), mime.as_deref()) {
                bail!("{} is empty", file.display());
            }
            finish(&session, persist).await?;
        }
    }

    Ok(())
}

fn select(session: &EditorSession, id: &str) -> anyhow::Result<()> {
    let issue: GeneratedContent = session
        .all_issues()
        .into_iter()
        .find(|issue| issue.id.as_deref() == Some(id))
        .ok_or_else(|| anyhow!("No {} issue with id {}", session.publication(), id))?;
    session.select_issue(issue);
    Ok(())
}

fn split_assignment(entry: &str) -> anyhow::Result<(&str, &str)> {
    entry
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected PATH=VALUE, got '{}'", entry))
}

fn apply(session: &EditorSession, path: &str, value: Value) -> anyhow::Result<()> {
    if !session.update_field(path, None, value) {
        bail!("Refused to set {}", path);
    }
    Ok(())
}

/// Saves or publishes as requested, then prints the preview.
async fn finish(session: &EditorSession, persist: PersistArgs) -> anyhow::Result<()> {
    if persist.publish && !session.publish().await {
        bail!("Publishing failed");
    }
    if persist.draft && !session.save_draft().await {
        bail!("Saving the draft failed");
    }
    let preview = session.preview().context("Nothing to show")?;
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}
