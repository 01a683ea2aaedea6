use std::path::{Path, PathBuf};
use std::process;

use clap::Args;

use modlink::api::LinkRequest;
use modlink::config::LinkConfig;
use modlink::diagnostic::Diagnostic;
use modlink::logging::init_logging;
use modlink::pipeline::StageSpec;

use super::{fail, split_modules};

#[derive(Args)]
pub struct LinkArgs {
    /// Module catalog file (TOML)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Root modules, comma-separated; may be repeated
    #[arg(long = "add-modules", value_name = "MODULES")]
    pub add_modules: Vec<String>,
    /// Transform stage as NAME=OPTIONS; repeat to add stages, run in order
    #[arg(long = "stage", value_name = "NAME=OPTIONS")]
    pub stages: Vec<String>,
    /// Output image directory (must not exist or be empty)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Link file (default: modlink.toml in the current directory or above)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn cmd_link(args: LinkArgs, log: Option<String>) {
    let file = match link_file(args.config.as_deref()) {
        Some(path) => match LinkConfig::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                init_logging(log.as_deref());
                fail(&e)
            }
        },
        None => None,
    };
    init_logging(log.as_deref().or(file.as_ref().and_then(|f| f.log.as_deref())));

    let request = match merge(args, file.unwrap_or_default()) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("error: {}", msg);
            process::exit(1);
        }
    };

    let outcome = match modlink::api::link(&request) {
        Ok(o) => o,
        Err(e) => fail(&e),
    };
    println!(
        "Linked {} modules, {} entries ({} bytes) into {}",
        outcome.assembly.modules.len(),
        outcome.manifest.entries.len(),
        outcome.manifest.total_size(),
        request.output.display()
    );
    println!("  digest: {}", outcome.manifest.digest);
    if outcome.manifest.entries.is_empty() {
        Diagnostic::warning(format!("image '{}' has no entries", request.output.display()))
            .with_help("check the --stage patterns against the resolved modules".to_string())
            .render("", None);
    }
}

fn link_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| LinkConfig::find(&dir)),
    }
}

/// Flags override the link file; list flags replace the file's list.
fn merge(args: LinkArgs, file: LinkConfig) -> Result<LinkRequest, String> {
    let catalog = args
        .catalog
        .or(file.catalog)
        .ok_or("no catalog given (use --catalog or a link file)")?;
    let output = args
        .output
        .or(file.output)
        .ok_or("no output directory given (use --output or a link file)")?;

    let roots = if args.add_modules.is_empty() {
        file.roots
    } else {
        split_modules(&args.add_modules)
    };
    if roots.is_empty() {
        return Err("no root modules given (use --add-modules or `roots` in a link file)".into());
    }

    let stages = if args.stages.is_empty() {
        file.stages
    } else {
        args.stages.iter().map(|s| StageSpec::parse(s)).collect()
    };

    Ok(LinkRequest {
        catalog,
        roots,
        stages,
        output,
    })
}
