use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use stencil_core::AppConfig;
use stencil_core::config::{DEFAULT_HOST, DEFAULT_PORT};

mod commands;
mod logging;
mod readline;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Fill HTML templates from JSON data and preview the results over HTTPS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    server: ServerArgs,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct ServerArgs {
    /// HTTPS port
    #[arg(long, global = true, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Host name used in generated links
    #[arg(long, global = true, env = "STENCIL_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Address to listen on
    #[arg(long, global = true, env = "STENCIL_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Installation root containing ssl/ and results/
    #[arg(long, global = true, env = "STENCIL_ROOT", default_value = ".")]
    root: PathBuf,
}

impl From<ServerArgs> for AppConfig {
    fn from(args: ServerArgs) -> Self {
        AppConfig {
            host: args.host,
            port: args.port,
            bind: args.bind,
            root: args.root,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve generated files and prompt for templates (default)
    Serve,
    /// Render one template with one data file, without prompting
    Render {
        /// Path to the HTML template
        template: String,
        /// Path to the JSON data file
        data: String,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(cli.server.into()).await?,
        Commands::Render {
            template,
            data,
            output,
        } => commands::render::run(&template, &data, output.as_deref())?,
    }

    Ok(())
}
