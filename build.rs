// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe tree root
fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .value_name("DIR")
        .help("Root of the recipe tree [default: current directory]")
}

/// Common argument: TOML configuration file
fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("TOML configuration file")
}

fn directory_fallback_arg() -> Arg {
    Arg::new("directory_fallback")
        .long("directory-fallback")
        .action(ArgAction::SetTrue)
        .help("Look names missing from the index up by package directory")
}

fn unsorted_arg() -> Arg {
    Arg::new("unsorted")
        .long("unsorted")
        .action(ArgAction::SetTrue)
        .help("Walk directories in listing order instead of sorting them")
}

fn build_cli() -> Command {
    Command::new("portdeps")
        .version(env!("CARGO_PKG_VERSION"))
        .author("portdeps contributors")
        .about("Resolve build dependencies of recipes in a ports tree")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log output (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("resolve")
                .about("List every package needed to build the given packages")
                .arg(
                    Arg::new("packages")
                        .required(true)
                        .num_args(1..)
                        .help("Package names, bare (gcc) or prefixed (cmd:gcc)"),
                )
                .arg(root_arg())
                .arg(config_arg())
                .arg(directory_fallback_arg())
                .arg(unsorted_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the result and diagnostics as JSON"),
                ),
        )
        .subcommand(
            Command::new("provides")
                .about("Show which recipe provides a name")
                .arg(Arg::new("name").required(true).help("Name to look up, bare or prefixed"))
                .arg(root_arg())
                .arg(config_arg())
                .arg(directory_fallback_arg())
                .arg(unsorted_arg()),
        )
        .subcommand(
            Command::new("parse")
                .about("Show the sections parsed from a single recipe file")
                .arg(Arg::new("recipe").required(true).help("Path to the recipe file"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the sections as JSON"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("portdeps.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
