use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// paddock - racing team site backend
#[derive(Parser)]
#[command(name = "paddock")]
#[command(about = "Accounts and sessions for the paddock site", long_about = None)]
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
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Change the role of a user
    SetRole {
        email: String,
        #[arg(value_enum)]
        role: cli::user::Role,
    },
    /// Sign a user out of every device
    SignOut { email: String },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Delete expired sessions
    Prune,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = paddock::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    paddock::observability::init_observability(
        "paddock",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => paddock::server::serve(config, host, port).await,
        Commands::Migrate => paddock::migrate::migrate(&config).await,
        Commands::Reset => paddock::migrate::reset(&config).await,
        Commands::User { command } => match command {
            UserCommands::SetRole { email, role } => cli::user::set_role(config, email, role).await,
            UserCommands::SignOut { email } => cli::user::sign_out(config, email).await,
        },
        Commands::Session { command } => match command {
            SessionCommands::Prune => cli::session::prune(config).await,
        },
    }
}
