//! Generates the route registry from `src/routes/`.
//!
//! Every `.rs` file below `src/routes/` (except `mod.rs`) becomes a module in
//! `$OUT_DIR/routes.rs`, registered under its path relative to the routes
//! directory. Files are visited in sorted order so registration order is stable.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const ROUTES_DIR: &str = "src/routes";

fn collect(dir: &Path, files: &mut Vec<PathBuf>) {
    let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(err) => panic!("cannot read routes directory {}: {err}", dir.display()),
    };
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "rs")
            && path.file_name().is_some_and(|name| name != "mod.rs")
        {
            files.push(path);
        }
    }
}

fn check_contract(path: &Path, relative: &str) {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("cannot read route module {relative}: {err}"));
    for export in ["pub fn route_def", "pub async fn handler"] {
        if !source.contains(export) {
            panic!("route module {relative} must export `{export}`");
        }
    }
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
    let root = manifest_dir.join(ROUTES_DIR);

    println!("cargo:rerun-if-changed={ROUTES_DIR}");

    let mut files = Vec::new();
    collect(&root, &mut files);

    let mut modules = String::new();
    let mut registrations = String::new();
    for (index, path) in files.iter().enumerate() {
        let relative = path
            .strip_prefix(&root)
            .expect("route file under routes directory")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        check_contract(path, &relative);
        println!("cargo:rerun-if-changed={}", path.display());

        let absolute = path.to_string_lossy();
        writeln!(modules, "#[path = {absolute:?}]\nmod route_{index};").unwrap();
        writeln!(
            registrations,
            "        crate::routing::RouteModule::new({relative:?}, route_{index}::route_def(), route_{index}::handler),"
        )
        .unwrap();
    }

    let generated = format!(
        "{modules}\n\
         /// Every route module under `{ROUTES_DIR}`, in sorted file order.\n\
         pub fn discovered() -> Vec<crate::routing::RouteModule> {{\n    \
         vec![\n{registrations}    ]\n}}\n"
    );

    fs::write(out_dir.join("routes.rs"), generated).expect("write generated route registry");
}
