#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the parcel map.
//!
//! ```text
//! parcel_map render <file> [--select <key>] [--config viewport.toml] [--json]
//! parcel_map export <file> [--select <key>] [--out parcels.geojson]
//! parcel_map search <query>... [--session <id>]
//! ```
//!
//! `<file>` holds either a JSON array of parcels or a saved search
//! response. The search endpoint is read from `PARCEL_SEARCH_URL`.

mod input;
mod report;
mod view;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use parcel_map_parcel_models::{Parcel, ParcelKey};
use parcel_map_search::{SearchClient, SearchConversation};
use parcel_map_viewport::{Reaction, SurfaceSize};

use crate::input::{CliError, load_batch, load_config};
use crate::view::MapView;

#[derive(Parser)]
#[command(name = "parcel_map", about = "Render, export, and search parcel batches")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Viewport config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Map surface width in pixels
    #[arg(long, default_value = "1024")]
    width: u32,
    /// Map surface height in pixels
    #[arg(long, default_value = "768")]
    height: u32,
    /// Print the viewport instruction as JSON
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    const fn surface(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the render model and the settled viewport for a batch
    Render {
        /// Parcel array or search response (JSON)
        file: PathBuf,
        /// Key of the parcel to select, as listed by `render`
        #[arg(long)]
        select: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Write the render model as a GeoJSON `FeatureCollection`
    Export {
        /// Parcel array or search response (JSON)
        file: PathBuf,
        /// Key of the parcel to mark as selected
        #[arg(long)]
        select: Option<String>,
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Ask the search service, refining with each further query
    Search {
        /// One or more queries, sent in order within the same session
        #[arg(required = true)]
        queries: Vec<String>,
        /// Continue an existing session
        #[arg(long)]
        session: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { file, select, view } => {
            let parcels = load_batch(&file)?;
            let mut map = MapView::new(load_config(view.config.as_deref())?);
            let reaction = map.show_batch(parcels, select.map(ParcelKey::from).as_ref())?;
            show(&mut map, reaction, &view).await?;
        }
        Commands::Export { file, select, out } => {
            let parcels = load_batch(&file)?;
            export(&parcels, select.map(ParcelKey::from).as_ref(), out.as_deref())?;
        }
        Commands::Search {
            queries,
            session,
            view,
        } => {
            let mut map = MapView::new(load_config(view.config.as_deref())?);
            let client = SearchClient::from_env();
            let mut conversation = match session {
                Some(id) => SearchConversation::with_session(client, id),
                None => SearchConversation::new(client),
            };

            for query in &queries {
                println!("> {query}");
                let Some(turn) = conversation.ask(query).await? else {
                    continue;
                };
                println!("{}\n", turn.message);
                match map.apply_turn(turn) {
                    Some(reaction) => show(&mut map, reaction, &view).await?,
                    None => println!(
                        "(keeping the current {} parcels on the map)\n",
                        map.session().parcels().len()
                    ),
                }
            }

            if let Some(id) = conversation.session_id() {
                println!("session: {id}");
            }
        }
    }

    Ok(())
}

async fn show(map: &mut MapView, reaction: Reaction, view: &ViewArgs) -> Result<(), CliError> {
    let session = map.session();
    print!(
        "{}",
        report::describe_model(session.parcels().len(), &session.render_model())
    );

    let instruction = map.settle(reaction).await;
    if view.json {
        println!("{}", serde_json::to_string_pretty(&instruction)?);
    } else {
        print!(
            "{}",
            report::describe_viewport(instruction.as_ref(), view.surface())
        );
    }

    Ok(())
}

fn export(
    parcels: &[Parcel],
    select: Option<&ParcelKey>,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let model = parcel_map_render::build(parcels, select);
    let collection = parcel_map_render::export::to_feature_collection(&model);
    let json = serde_json::to_string_pretty(&collection)?;

    match out {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!(
                "Wrote {} features to {}",
                collection.features.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
