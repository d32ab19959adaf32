//! mwdd - MediaWiki docker development environment CLI

mod commands;

use clap::{Parser, Subcommand};
use mwdd_core::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mwdd")]
#[command(author, version, about = "The MediaWiki-Docker-Dev like development environment", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the working directory of the development environment
    Where,

    /// Create the default containers
    Create,

    /// Destroy the development environment, its containers and volumes
    Destroy,

    /// Suspend all containers
    Suspend,

    /// Resume all containers
    Resume,

    /// Run a raw docker-compose command against the environment
    #[command(name = "docker-compose", alias = "dc")]
    DockerCompose {
        /// Subcommand and arguments, passed straight through
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// MediaWiki service
    #[command(subcommand)]
    Mediawiki(MediawikiCommands),

    /// Read or change the environment's .env variables
    #[command(subcommand)]
    Env(EnvCommands),

    /// Display or change configuration settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum MediawikiCommands {
    /// Create the MediaWiki containers
    Create,

    /// Destroy the MediaWiki containers and their data volumes
    Destroy,

    /// Suspend the MediaWiki containers
    Suspend,

    /// Resume the MediaWiki containers
    Resume,

    /// Execute a command in the MediaWiki container
    #[command(after_help = "Examples:\n  mwdd mediawiki exec bash\n  mwdd mediawiki exec -- bash --help\n  mwdd mediawiki exec --user root bash")]
    Exec {
        /// User to run as, defaults to the current OS user uid:gid
        #[arg(short, long)]
        user: Option<String>,
        /// Command to execute
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        cmd: Vec<String>,
    },

    /// Run MediaWiki phpunit in the MediaWiki container
    Phpunit {
        /// Extra arguments for phpunit
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run composer in a fresh container against the MediaWiki code
    Composer {
        /// Arguments for composer
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Install a new MediaWiki site using install.php
    Install {
        /// Type of database to install
        #[arg(long, default_value = "sqlite", value_parser = ["sqlite", "mysql"])]
        dbtype: String,
        /// Name of the database to install (stick to letters and numbers)
        #[arg(long, default_value = "default")]
        dbname: String,
    },
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Print the location of the .env file
    Where,

    /// List all environment variables
    List,

    /// Get an environment variable
    Get { name: String },

    /// Set an environment variable
    Set { name: String, value: String },

    /// Delete an environment variable
    Delete { name: String },

    /// Clear all environment variables
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the raw config
    Show,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let env = Environment::default_for_user()?;

    match cli.command {
        Commands::Where => commands::where_cmd(&env),
        Commands::Create => commands::create(&env).await?,
        Commands::Destroy => commands::destroy(&env).await?,
        Commands::Suspend => commands::suspend(&env).await?,
        Commands::Resume => commands::resume(&env).await?,
        Commands::DockerCompose { args } => commands::docker_compose(&env, args).await?,
        Commands::Mediawiki(cmd) => match cmd {
            MediawikiCommands::Create => commands::mediawiki_create(&env).await?,
            MediawikiCommands::Destroy => commands::mediawiki_destroy(&env).await?,
            MediawikiCommands::Suspend => commands::mediawiki_suspend(&env).await?,
            MediawikiCommands::Resume => commands::mediawiki_resume(&env).await?,
            MediawikiCommands::Exec { user, cmd } => {
                commands::mediawiki_exec(&env, user, cmd).await?
            }
            MediawikiCommands::Phpunit { args } => commands::mediawiki_phpunit(&env, args).await?,
            MediawikiCommands::Composer { args } => {
                commands::mediawiki_composer(&env, args).await?
            }
            MediawikiCommands::Install { dbtype, dbname } => {
                commands::mediawiki_install(&env, &dbtype, &dbname).await?
            }
        },
        Commands::Env(cmd) => match cmd {
            EnvCommands::Where => commands::env_where(&env)?,
            EnvCommands::List => commands::env_list(&env)?,
            EnvCommands::Get { name } => commands::env_get(&env, &name)?,
            EnvCommands::Set { name, value } => commands::env_set(&env, &name, &value)?,
            EnvCommands::Delete { name } => commands::env_delete(&env, &name)?,
            EnvCommands::Clear => commands::env_clear(&env)?,
        },
        Commands::Config(ConfigCommands::Show) => commands::config_show()?,
    }

    Ok(())
}
