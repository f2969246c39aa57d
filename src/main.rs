//! CLI entry point for postdeck

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postdeck::catalog::SortKey;
use postdeck::commands::browse::BrowseOptions;

#[derive(Parser)]
#[command(name = "postdeck")]
#[command(version)]
#[command(about = "Markdown blog content store and template catalog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List site information
    List {
        /// Type of content to list (post, slug, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show a single post with its rendered content
    Show {
        /// Slug of the post
        slug: String,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the template catalog
    #[command(alias = "b")]
    Browse {
        /// Case-insensitive search over title and description
        #[arg(short, long)]
        query: Option<String>,

        /// Category to select (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,

        /// Tag to select (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Sort order (most-popular, newest, alphabetical)
        #[arg(short, long, default_value = "most-popular")]
        sort: SortKey,

        /// Number of extra pages to load
        #[arg(short, long, default_value = "0")]
        more: usize,
    },

    /// List the routes to prerender
    Routes {
        /// Print absolute URLs
        #[arg(long)]
        full: bool,
    },

    /// Start the JSON API server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postdeck=debug,info"
    } else {
        "postdeck=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { r#type } => {
            let site = postdeck::Site::new(&base_dir)?;
            postdeck::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { slug, json } => {
            let site = postdeck::Site::new(&base_dir)?;
            postdeck::commands::show::run(&site, &slug, json)?;
        }

        Commands::Browse {
            query,
            categories,
            tags,
            sort,
            more,
        } => {
            let site = postdeck::Site::new(&base_dir)?;
            let options = BrowseOptions {
                query,
                categories,
                tags,
                sort,
                more,
            };
            postdeck::commands::browse::run(&site, &options).await?;
        }

        Commands::Routes { full } => {
            let site = postdeck::Site::new(&base_dir)?;
            postdeck::commands::routes::run(&site, full)?;
        }

        Commands::Server { port, ip } => {
            let site = postdeck::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            postdeck::server::start(&site, &ip, port).await?;
        }

        Commands::Version => {
            println!("postdeck version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
