// Copyright 2023-2024 the docver developers
// Licensed under the MIT License.

//! The main docver command-line interface.
//!
//! Small utilities for maintaining a versioned documentation site: injecting
//! the version-selector widget into rendered pages, and emitting the JSON
//! manifest that the widget reads.

use log::{error, info};
use std::path::PathBuf;
use structopt::StructOpt;

mod config;
mod errors;
mod logger;
mod manifest;
mod sidebar;

use errors::Result;

#[derive(Debug, PartialEq, StructOpt)]
#[structopt(about = "maintain versioned documentation sites")]
struct DocverOptions {
    #[structopt(subcommand)]
    command: Commands,
}

trait Command {
    fn execute(self) -> Result<i32>;
}

#[derive(Debug, PartialEq, StructOpt)]
enum Commands {
    #[structopt(name = "branch-manifest")]
    /// Generate the JSON manifest of documentation branches
    BranchManifest(BranchManifestCommand),

    #[structopt(name = "inject-sidebar")]
    /// Insert the version-selector widget into rendered HTML pages
    InjectSidebar(InjectSidebarCommand),
}

impl Command for Commands {
    fn execute(self) -> Result<i32> {
        match self {
            Commands::BranchManifest(o) => o.execute(),
            Commands::InjectSidebar(o) => o.execute(),
        }
    }
}

fn main() {
    let opts = DocverOptions::from_args();

    if let Err(e) = logger::Logger::init() {
        eprintln!("error: cannot initialize logging backend: {}", e);
        std::process::exit(1);
    }
    log::set_max_level(log::LevelFilter::Info);

    let exitcode = match opts.command.execute() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            e.chain()
                .skip(1)
                .for_each(|cause| logger::Logger::print_cause(cause));
            1
        }
    };

    std::process::exit(exitcode);
}

// branch-manifest

#[derive(Debug, PartialEq, StructOpt)]
struct BranchManifestCommand {
    #[structopt(
        long = "config",
        default_value = "docver.toml",
        help = "Path of the configuration file"
    )]
    config_path: PathBuf,

    #[structopt(
        short = "o",
        long = "output",
        help = "Path of the manifest file to write [default: branches.json]"
    )]
    output_path: Option<PathBuf>,

    #[structopt(
        long = "url-prefix",
        help = "URL prefix of the versioned doc trees [default: /dgl_docs/]"
    )]
    url_prefix: Option<String>,

    #[structopt(
        required = true,
        help = "Name(s) of the documentation branch(es), in display order"
    )]
    branches: Vec<String>,
}

impl Command for BranchManifestCommand {
    fn execute(self) -> Result<i32> {
        let cfg = config::ConfigurationFile::get(&self.config_path)?;
        let output_path = self.output_path.unwrap_or(cfg.manifest.output_path);
        let url_prefix = self.url_prefix.unwrap_or(cfg.manifest.url_prefix);

        let m = manifest::Manifest::from_branches(&self.branches, &url_prefix)?;
        m.write(&output_path)?;

        println!(
            "JSON file '{}' has been generated successfully.",
            output_path.display()
        );
        Ok(0)
    }
}

// inject-sidebar

#[derive(Debug, PartialEq, StructOpt)]
struct InjectSidebarCommand {
    #[structopt(
        long = "config",
        default_value = "docver.toml",
        help = "Path of the configuration file"
    )]
    config_path: PathBuf,

    #[structopt(
        long = "root",
        default_value = ".",
        help = "Root directory of the rendered HTML tree"
    )]
    root: PathBuf,

    #[structopt(
        long = "template",
        help = "Path of the template fragment to inject [default: ./version_template.html]"
    )]
    template_path: Option<PathBuf>,

    #[structopt(
        long = "anchor-class",
        help = "Class of the element the fragment is inserted after [default: wy-grid-for-nav]"
    )]
    anchor_class: Option<String>,
}

impl Command for InjectSidebarCommand {
    fn execute(self) -> Result<i32> {
        let cfg = config::ConfigurationFile::get(&self.config_path)?;

        let mut sidebar_cfg = cfg.sidebar;

        if let Some(p) = self.template_path {
            sidebar_cfg.template_path = p;
        }

        if let Some(c) = self.anchor_class {
            sidebar_cfg.anchor_class = c;
        }

        let injector = sidebar::SidebarInjector::load(&sidebar_cfg)?;
        let n_modified = injector.inject_tree(&self.root)?;

        if n_modified == 0 {
            info!("no pages with an anchor element found");
        } else {
            info!("injected the version sidebar into {} page(s)", n_modified);
        }

        Ok(0)
    }
}
