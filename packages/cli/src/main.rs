#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for site locations.
//!
//! ```text
//! uic_inventory_cli locate <x> <y>
//! uic_inventory_cli geocode --street "326 east south temple" --zone slc
//! uic_inventory_cli site show <id>
//! uic_inventory_cli site combine --parcels parcels.geojson --select 12,13 [--site-id 4 --account-id 1 --submit]
//! ```
//!
//! The site commands talk to `UIC_API_BASE_URL` (bearer `UIC_API_TOKEN`);
//! geocoding needs `UGRC_API_KEY`.

mod headless;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use headless::HeadlessView;
use uic_inventory_boundary::geometry::extent;
use uic_inventory_boundary::parcels::{
    DEFAULT_ID_PROPERTY, boundary_to_geojson, parcels_from_geojson,
};
use uic_inventory_boundary::projection::format_address;
use uic_inventory_boundary::{BoundaryCaptureSession, SiteLocationForm};
use uic_inventory_boundary_models::map::{MapEvent, ScreenPoint};
use uic_inventory_boundary_models::{Action, ParcelId};
use uic_inventory_geocoder::{Geocoder as _, WebApiGeocoder};
use uic_inventory_site::{SiteClient, parse_site_geometry};
use uic_inventory_site_models::{MapPoint, SpatialReference};

#[derive(Parser)]
#[command(name = "uic_inventory_cli", about = "Locate, geocode, and bound UIC inventory sites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a Web Mercator point as a site address
    Locate {
        /// Easting in meters
        #[arg(allow_hyphen_values = true)]
        x: f64,
        /// Northing in meters
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },
    /// Geocode a street address
    Geocode {
        /// Street address
        #[arg(long)]
        street: String,
        /// City or ZIP code
        #[arg(long)]
        zone: String,
    },
    /// Site location commands
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },
}

#[derive(Subcommand)]
enum SiteCommands {
    /// Print a stored site and its boundary extent
    Show {
        /// Site ID
        id: i64,
    },
    /// Build a boundary by selecting parcels
    Combine {
        /// `GeoJSON` feature collection of parcels in Web Mercator
        #[arg(long)]
        parcels: PathBuf,
        /// Parcel ids to click, in order; repeating an id removes it again
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<i64>,
        /// Property holding the parcel id
        #[arg(long, default_value = DEFAULT_ID_PROPERTY)]
        id_property: String,
        /// Start from this stored site
        #[arg(long)]
        site_id: Option<i64>,
        /// Account saving the location
        #[arg(long)]
        account_id: Option<i64>,
        /// Save the result to the site API
        #[arg(long, requires_all = ["site_id", "account_id"])]
        submit: bool,
        /// Print the boundary as `GeoJSON` instead of Esri JSON
        #[arg(long)]
        geojson: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Locate { x, y } => {
            println!("{}", format_address(MapPoint::web_mercator(x, y)));
        }
        Commands::Geocode { street, zone } => {
            let geocoder = WebApiGeocoder::from_env()?;
            match geocoder.geocode(&street, &zone).await? {
                Some(found) => println!(
                    "{} (score {:.1}) at {:.2}, {:.2}",
                    found.address, found.score, found.location.x, found.location.y
                ),
                None => {
                    eprintln!("No match for {street}, {zone}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Site { command } => run_site(command).await?,
    }

    Ok(())
}

async fn run_site(command: SiteCommands) -> Result<(), Box<dyn std::error::Error>> {
    let client = SiteClient::from_env();

    match command {
        SiteCommands::Show { id } => {
            let site = client.get_site(id).await?;
            println!("{}", serde_json::to_string_pretty(&site)?);

            if let Some(bounds) = parse_site_geometry(&site)?.as_ref().and_then(extent) {
                println!(
                    "Boundary extent: {:.2}, {:.2} to {:.2}, {:.2}",
                    bounds.xmin, bounds.ymin, bounds.xmax, bounds.ymax
                );
            } else {
                println!("No boundary");
            }
        }
        SiteCommands::Combine {
            parcels,
            select,
            id_property,
            site_id,
            account_id,
            submit,
            geojson,
        } => {
            let text = tokio::fs::read_to_string(&parcels).await?;
            let layer = parcels_from_geojson(&text, SpatialReference::WEB_MERCATOR, &id_property)?;
            log::info!("Loaded {} parcels from {}", layer.len(), parcels.display());

            let mut session =
                BoundaryCaptureSession::new(HeadlessView::new(), SiteLocationForm::new());
            if let Some(site_id) = site_id {
                session.hydrate(&client.get_site(site_id).await?)?;
            }
            session.dispatch(Action::SelectSiteFromParcel);

            for id in select {
                let Some(parcel) = layer.iter().find(|p| p.id == ParcelId(id)) else {
                    eprintln!("Parcel {id} not found in {}", parcels.display());
                    std::process::exit(1);
                };
                let Some(subscription) = session.view().live() else {
                    return Err("parcel tool is not listening".into());
                };

                let [x, y] = parcel.geometry.rings[0][0];
                let request = session.handle_map_event(
                    subscription,
                    MapEvent::Click {
                        screen_point: ScreenPoint { x: 0.0, y: 0.0 },
                        map_point: MapPoint::web_mercator(x, y),
                    },
                );
                if let Some(request) = request {
                    session.handle_hit_test(&request, std::slice::from_ref(parcel))?;
                }
            }

            let Some(boundary) = session.state().geometry.clone() else {
                println!("No boundary");
                return Ok(());
            };

            if geojson {
                println!("{}", boundary_to_geojson(&boundary)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&boundary)?);
            }

            if let (true, Some(site_id), Some(account_id)) = (submit, site_id, account_id) {
                if session.submit(&client, account_id, site_id).await? {
                    println!("Saved site {site_id}");
                } else {
                    println!("Site {site_id} unchanged");
                }
            }
        }
    }

    Ok(())
}
