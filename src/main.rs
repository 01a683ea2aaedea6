use clap::{Parser, Subcommand};

mod cli;

use cli::link::{cmd_link, LinkArgs};
use cli::plugins::cmd_plugins;
use cli::resolve::{cmd_resolve, ResolveArgs};

#[derive(Parser)]
#[command(
    name = "modlink",
    version,
    about = "Resolve a module graph and link its resources into an image"
)]
struct Cli {
    /// Tracing filter, e.g. "info" or "modlink::pipeline=debug" (RUST_LOG wins)
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve root modules, run the stages and write a directory image
    Link(LinkArgs),
    /// Print the dependency-first load order of the resolved modules
    Resolve(ResolveArgs),
    /// List the built-in plugins
    Plugins,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Link(args) => cmd_link(args, cli.log),
        Command::Resolve(args) => {
            modlink::logging::init_logging(cli.log.as_deref());
            cmd_resolve(args)
        }
        Command::Plugins => cmd_plugins(),
    }
}
