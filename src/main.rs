use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// larder - recipe, tag and ingredient records API
#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Recipe records API with tags, ingredients and images", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Create a staff superuser account
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = larder::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    larder::observability::init_observability(
        "larder",
        env!("CARGO_PKG_VERSION"),
        &config.logging,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => larder::db::migrate(&config.database.url).await,
        Commands::Reset => larder::db::reset(&config.database.url).await,
        Commands::CreateSuperuser { email, password } => {
            cli::user::create_superuser(config, email, password).await
        }
    }
}
