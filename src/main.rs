//! Deploys a diamond from a manifest and prints its loupe view.
//!
//! # Usage
//! ```text
//! diamond <manifest.toml> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `manifest.toml`: cuts to apply on top of a freshly deployed diamond
//!
//! # Options
//! - `--config <file>`: diamond configuration (defaults apply if omitted)
//! - `--quiet`: only log warnings and errors

use diamond::config::{DiamondConfig, Manifest, ManifestCut, parse_selector};
use diamond::core::cut::{CutAction, FacetCut};
use diamond::core::diamond::Diamond;
use diamond::module::builtin::init::{INIT, standard_interfaces};
use diamond::module::builtin::{StandardModules, deploy_standard};
use diamond::module::calldata::encode_call;
use diamond::module::host::ModuleHost;
use diamond::types::address::Address;
use diamond::types::selector::Selector;
use diamond::utils::log::{self, Level};
use diamond::{error, info};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let manifest_path = &args[1];
    let mut config_path: Option<&str> = None;
    let mut quiet = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("--config requires an argument");
                    process::exit(1);
                }
                config_path = Some(&args[i]);
                i += 1;
            }
            "--quiet" => {
                quiet = true;
                i += 1;
            }
            other => {
                eprintln!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let config = match config_path {
        Some(path) => DiamondConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }),
        None => DiamondConfig::default(),
    };
    config.log.apply();
    if quiet {
        log::set_max_level(Level::Warn);
    }

    let manifest = Manifest::load(manifest_path).unwrap_or_else(|e| {
        error!("Failed to load manifest {manifest_path}: {e}");
        process::exit(1);
    });

    let mut host = ModuleHost::new();
    let modules = deploy_standard(&mut host);
    let owner = Address::from_label(&manifest.owner);

    let mut diamond = Diamond::new(owner, host, modules.cut, config).unwrap_or_else(|e| {
        error!("Failed to deploy diamond: {e}");
        process::exit(1);
    });

    let cuts = build_cuts(&diamond, &manifest.cuts).unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });
    let (init, init_calldata) = init_call(&manifest, &modules);

    if !cuts.is_empty() || init.is_some() {
        if let Err(e) = diamond.diamond_cut(owner, &cuts, init, &init_calldata) {
            error!("Cut rejected: {e}");
            process::exit(1);
        }
    }

    print_summary(&diamond);
}

/// Resolves manifest module names against the deployed code.
fn build_cuts(diamond: &Diamond, cuts: &[ManifestCut]) -> Result<Vec<FacetCut>, String> {
    cuts.iter()
        .map(|cut| {
            let action = CutAction::from(cut.action);
            let module = match (action, cut.module.as_deref()) {
                (CutAction::Remove, _) => Address::ZERO,
                (_, Some(name)) => diamond
                    .host()
                    .find(name)
                    .ok_or_else(|| format!("Unknown module `{name}`"))?,
                (_, None) => return Err(format!("{action} cut needs a module")),
            };
            let selectors = cut
                .signatures
                .iter()
                .map(|s| parse_selector(s).map_err(|e| e.to_string()))
                .collect::<Result<Vec<Selector>, String>>()?;
            Ok(FacetCut {
                module,
                action,
                selectors,
            })
        })
        .collect()
}

fn init_call(manifest: &Manifest, modules: &StandardModules) -> (Option<Address>, Vec<u8>) {
    if manifest.init_interfaces {
        (Some(modules.init), encode_call(INIT, &standard_interfaces()))
    } else {
        (None, Vec::new())
    }
}

fn print_summary(diamond: &Diamond) {
    info!("Diamond {} owned by {}", diamond.address(), diamond.owner());
    println!("diamond: {}", diamond.address());
    println!("owner:   {}", diamond.owner());
    for facet in diamond.facets() {
        let name = diamond
            .host()
            .code_at(facet.module)
            .map(|code| code.name().to_string())
            .unwrap_or_else(|| "?".into());
        println!("module {} ({name})", facet.module);
        for selector in &facet.selectors {
            let protected = if diamond.is_protected(*selector) {
                " [protected]"
            } else {
                ""
            };
            println!("    {selector}{protected}");
        }
    }
    let interfaces: Vec<String> = standard_interfaces()
        .into_iter()
        .filter(|id| diamond.supports_interface(*id))
        .map(|id| id.to_string())
        .collect();
    if !interfaces.is_empty() {
        println!("interfaces: {}", interfaces.join(", "));
    }
    println!("selectors: {}", diamond.selector_count());
    println!("state root: {}", diamond.state_root());
}

const USAGE: &str = "\
Diamond Deployer

USAGE:
    {program} <manifest.toml> [OPTIONS]

ARGS:
    <manifest.toml>    Cuts to apply after deployment

OPTIONS:
    --config <file>    Diamond configuration file
    --quiet            Only log warnings and errors
    -h, --help         Print this help message

MANIFEST:
    owner = \"deployer\"
    init_interfaces = true

    [[cut]]
    module = \"loupe\"          # cut, loupe, ownership or init
    action = \"add\"            # add, replace or remove
    signatures = [\"facets()\", \"facetAddress(bytes4)\"]

EXAMPLES:
    {program} diamond.toml
    {program} diamond.toml --config config.toml --quiet
";

/// Prints usage information to stderr.
fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
