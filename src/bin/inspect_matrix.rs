// inspect_matrix.rs - Print statistics for a pani matrix file

use clap::{Arg, ArgAction, Command};
use pani::output::{read_matrix, summarize};
use std::path::Path;

fn main() {
    let matches = Command::new("inspect_matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Summarizes an ANI or distance matrix written by pani")
        .arg(
            Arg::new("matrix")
                .value_name("FILE")
                .help("Matrix file (.tsv or .csv)")
                .required(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the summary as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("matrix")
        .map(String::as_str)
        .unwrap_or_default();
    let as_json = matches.get_flag("json");

    let matrix = match read_matrix(Path::new(path)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ ERROR: {}", e);
            std::process::exit(1);
        }
    };
    let summary = summarize(&matrix);

    if as_json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ ERROR: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("🔍 {}", path);
        println!("{}", summary);
    }
}
