use crate::config::load_config;
use crate::group::group;
use crate::ir::parse_tree_document;
use crate::layout::compute_layout;
use crate::layout_dump::LayoutDump;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdl", version, about = "Generation-banded genealogy graph layout")]
pub struct Args {
    /// Input tree document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout dump JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON/JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Minimum horizontal gap between sibling subtrees
    #[arg(long = "node-sep")]
    pub node_sep: Option<f32>,

    /// Vertical gap between generation rows
    #[arg(long = "rank-sep")]
    pub rank_sep: Option<f32>,

    /// Horizontal offset between the members of a couple
    #[arg(long = "couple-gap")]
    pub couple_gap: Option<f32>,

    /// Fit margin around the laid-out tree
    #[arg(long = "padding")]
    pub padding: Option<f32>,

    /// Keep raw coordinates instead of fitting to the padded origin
    #[arg(long = "no-fit")]
    pub no_fit: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(value) = args.node_sep {
        config.node_sep = value;
    }
    if let Some(value) = args.rank_sep {
        config.rank_sep = value;
    }
    if let Some(value) = args.couple_gap {
        config.couple_gap = value;
    }
    if let Some(value) = args.padding {
        config.padding = value;
    }
    if args.no_fit {
        config.fit = false;
    }

    let input = read_input(args.input.as_deref())?;
    let document = parse_tree_document(&input)?;
    let grouped = group(&document);
    let layout = compute_layout(&grouped, &config);
    let dump = LayoutDump::from_layout(&grouped, &layout);

    match args.output.as_deref() {
        Some(path) => dump.write_json(path)?,
        None => println!("{}", serde_json::to_string_pretty(&dump)?),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
