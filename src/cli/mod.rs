pub mod link;
pub mod plugins;
pub mod resolve;

use std::path::Path;
use std::process;

use modlink::diagnostic::report_error;
use modlink::error::LinkError;
use modlink::module::ModuleCatalog;

/// Print the error and exit with status 1.
pub fn fail(err: &LinkError) -> ! {
    report_error(err);
    process::exit(1);
}

fn load_catalog(path: &Path) -> ModuleCatalog {
    match modlink::config::load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => fail(&e),
    }
}

/// Flatten `--add-modules a,b --add-modules c` into `[a, b, c]`.
pub fn split_modules(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
