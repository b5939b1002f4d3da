//! Command-line interface.

use crate::viewport::PathStyle;
use clap::{Parser, Subcommand};

/// Map your activities.
#[derive(Parser, Debug)]
#[command(name = "Fitmap")]
#[command(version)]
#[command(about = "Serve and view FIT activities on a map", long_about = None)]
pub struct Cli {
    /// Sub-command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available sub-commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve activities from a directory of FIT files.
    Serve(ServeParams),

    /// View activities served by a fitmap server.
    View(ViewParams),
}

/// Parameters to serve activities.
#[derive(Parser, Debug)]
pub struct ServeParams {
    /// Base directory containing `.FIT` activity files.
    #[arg(long, short = 'd')]
    pub basedir: String,

    /// TCP port to listen on.
    #[arg(long, short = 'p', default_value_t = 8080)]
    pub port: u16,
}

/// Parameters to view activities.
#[derive(Parser, Debug)]
pub struct ViewParams {
    /// Base URL of the activity server.
    #[arg(long, short = 's', default_value = "http://localhost:8080")]
    pub server: String,

    /// JSON file overriding the default path style.
    #[arg(long = "style", value_parser = clap::value_parser!(PathStyle))]
    pub style: Option<PathStyle>,
}
