//! Fitmap - map your activities!

#![forbid(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use fitmap::activity::client::HttpClient;
use fitmap::activity::store::FitStore;
use fitmap::cli::{Cli, Command, ServeParams, ViewParams};
use fitmap::render::ActivityRenderer;
use fitmap::select::{selection_channel, selection_loop, UiMessage};
use fitmap::server::Server;
use fitmap::viewport::console::{ConsolePanel, ConsoleSurface};
use log::{debug, error, info};
use std::io::BufRead;
use std::sync::mpsc::channel;
use std::thread;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Serve(params) => serve_command(params),
        Command::View(params) => view_command(params),
    }
}

/// Implementation of the `serve` sub-command: serve the activities found in
/// a base directory of FIT files.
fn serve_command(params: ServeParams) -> anyhow::Result<()> {
    let store = FitStore::new(&params.basedir);
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(async {
        let server = Server::bind(store, params.port).await?;
        server.serve().await
    })
}

/// Implementation of the `view` sub-command: read activity selections from
/// standard input and render the selected activity.
fn view_command(params: ViewParams) -> anyhow::Result<()> {
    let (ui_tx, ui_rx) = channel();
    let (mut selection_tx, selection_rx) = selection_channel();

    // Separate threads for input, network and rendering.
    let server_url = params.server.clone();
    let network = thread::spawn(move || {
        // Create the Tokio runtime.
        let rt = Runtime::new().unwrap();

        // Spawn the root task.
        rt.block_on(async {
            let fetcher = HttpClient::new(reqwest::Client::new(), &server_url);

            match fetcher.list().await {
                Ok(ids) => {
                    println!("Available activities:");
                    for id in ids {
                        println!("  {id}");
                    }
                    println!("Type an activity identifier to render it.");
                }
                Err(e) => error!("Failed to list activities: {e}"),
            }

            selection_loop(&fetcher, &ui_tx, selection_rx).await;
        });
        info!("End of network thread");
    });

    let input = thread::spawn(move || {
        // One selection per line; EOF drops the sender and thereby ends the
        // selection loop.
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => selection_tx.select(line.trim()),
                Err(e) => {
                    error!("Failed to read selection: {e}");
                    break;
                }
            }
        }
        info!("End of input thread");
    });

    let mut renderer = ActivityRenderer::new(
        ConsoleSurface::new(),
        ConsolePanel::new(),
        params.style.unwrap_or_default(),
    );
    let mut latest_generation = 0;
    for msg in ui_rx.iter() {
        match msg {
            UiMessage::Activity {
                generation,
                id,
                activity,
            } => {
                if generation < latest_generation {
                    debug!("Discarding stale render for activity {id}");
                    continue;
                }
                latest_generation = generation;
                renderer.render(&id, &activity);
            }
        }
    }

    network.join().unwrap();
    input.join().unwrap();

    Ok(())
}
