use std::path::PathBuf;

use clap::Args;

use super::{fail, load_catalog, split_modules};

#[derive(Args)]
pub struct ResolveArgs {
    /// Module catalog file (TOML)
    #[arg(long)]
    pub catalog: PathBuf,
    /// Root modules, comma-separated; may be repeated
    #[arg(long = "add-modules", value_name = "MODULES", required = true)]
    pub add_modules: Vec<String>,
}

pub fn cmd_resolve(args: ResolveArgs) {
    let catalog = load_catalog(&args.catalog);
    let roots = split_modules(&args.add_modules);
    let resolved = match modlink::module::resolve(&catalog, &roots) {
        Ok(r) => r,
        Err(e) => fail(&e),
    };
    print!("{}", resolved.graph().render());
    eprintln!("{} of {} modules resolved", resolved.len(), catalog.len());
}
