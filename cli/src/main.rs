use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fasting_core::ui::PlanBoard;
use fasting_core::{PlanApi, PlanClient};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod render;
mod transport;

use transport::UreqTransport;

const DEFAULT_BASE_URL: &str = "http://localhost:5001/fasting";

#[derive(Parser)]
#[command(name = "fasting")]
#[command(version)]
#[command(about = "Create, list, edit and delete fasting plans", long_about = None)]
struct Cli {
    /// Plans API root, including the mount prefix
    #[arg(long, global = true, env = "FASTING_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all plans
    List,

    /// Create a new plan
    Create {
        /// Name of the plan, e.g. "16:8"
        name: String,

        /// Fasting window in hours
        #[arg(long)]
        duration: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        premium: bool,
    },

    /// Change any subset of a plan's fields
    Edit {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        /// Fasting window in hours
        #[arg(long)]
        duration: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        premium: Option<bool>,
    },

    /// Delete a plan
    Delete { id: Uuid },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(base_url = %cli.base_url, "using plans API");

    let api = PlanApi::new(PlanClient::new(&cli.base_url), UreqTransport::new());
    let mut board = PlanBoard::new();
    board.mount(&api);

    match cli.command {
        Command::List => {}
        Command::Create {
            name,
            duration,
            description,
            premium,
        } => {
            let data = board.form.data_mut();
            data.name = name;
            data.duration = duration;
            data.description = description;
            data.is_premium = premium;
            let plan = board
                .submit_form(&api)
                .context("failed to create plan")?;
            println!("Created {}", plan.id);
        }
        Command::Edit {
            id,
            name,
            duration,
            description,
            premium,
        } => {
            if let Some(error) = board.list.error() {
                bail!("{error}");
            }
            if !board.list.begin_edit(id) {
                bail!("no fasting plan with id {id}");
            }
            let data = board
                .list
                .edit_data_mut()
                .context("plan editor did not open")?;
            if let Some(name) = name {
                data.name = name;
            }
            if let Some(duration) = duration {
                data.duration = duration;
            }
            if let Some(description) = description {
                data.description = description;
            }
            if let Some(premium) = premium {
                data.is_premium = premium;
            }
            let plan = board
                .list
                .save_edit(&api)
                .context("failed to update plan")?;
            println!("Updated {}", plan.id);
        }
        Command::Delete { id } => {
            let message = board
                .list
                .delete(&api, id)
                .context("failed to delete plan")?;
            println!("{}", message.message);
        }
    }

    if let Some(error) = board.list.error() {
        bail!("{error}");
    }
    println!("{}", render::render_list(board.list.plans()));
    Ok(())
}
