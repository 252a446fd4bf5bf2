use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pattern_finder::api::{
    self, LocationRequest, MaterialsRequest, SearchRequest, UrlRequest, WebSearchRequest,
};
use pattern_finder::config::AppConfig;
use pattern_finder::database::Database;
use pattern_finder::PatternFinder;
use pattern_finder::models::{NewChecklistItem, NewProject, NewProjectMaterial, NewSavedPattern};
use pattern_finder::stores::{DEFAULT_RADIUS_M, NearbyStores};

#[derive(Parser)]
#[command(name = "pattern-finder", about = "Find sewing patterns, fabrics and fabric stores", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// List the fabric source keys (or pattern source keys with --patterns)
    Sources {
        #[arg(long)]
        patterns: bool,
    },

    /// Search one fabric/notions store
    Fabrics {
        source: String,
        query: String,
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },

    /// Search one pattern catalog
    Patterns {
        source: String,
        query: String,
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },

    /// Search Simplicity, McCall's and Burda Style through web search
    WebPatterns {
        query: String,
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },

    /// Pattern detail for a URL on a known pattern site
    Detail { url: String },

    /// Pattern detail for any URL, using the generic extractor for unknown hosts
    FromUrl { url: String },

    /// Pattern detail plus purchase links for each listed material
    Materials { url: String },

    /// List a Black Snail era collection
    Collection { key: String },

    /// Fabric and sewing shops near a point
    Nearby {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, default_value_t = DEFAULT_RADIUS_M)]
        radius: u32,
    },

    /// Purchase links for arbitrary materials
    FindMaterials { materials: Vec<String> },

    /// Manage saved sewing projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        budget: Option<f64>,
    },
    /// Project with its patterns, materials and checklist
    Show { id: i64 },
    Delete { id: i64 },

    Checklist { project_id: i64 },
    AddItem {
        project_id: i64,
        title: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    ToggleItem { project_id: i64, item_id: i64 },
    DeleteItem { project_id: i64, item_id: i64 },

    SavedPatterns { project_id: i64 },
    SavePattern {
        project_id: i64,
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        source: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        price: Option<String>,
    },
    DeletePattern { project_id: i64, pattern_id: i64 },

    Materials { project_id: i64 },
    AddMaterial {
        project_id: i64,
        name: String,
        #[arg(long, default_value = "")]
        quantity: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    ToggleMaterial { project_id: i64, material_id: i64 },
    DeleteMaterial { project_id: i64, material_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::from_env();
    run(&config, cli.command).await
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pattern_finder=info,warn")),
        1 => EnvFilter::new("pattern_finder=debug,info"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(config: &AppConfig, command: Command) -> Result<()> {
    let finder = PatternFinder::new(config)?;
    info!("Starting pattern finder");

    match command {
        Command::Sources { patterns: false } => print_json(&api::list_sources(&finder)),
        Command::Sources { patterns: true } => print_json(&api::list_pattern_sources(&finder)),
        Command::Fabrics {
            source,
            query,
            max_results,
        } => {
            let req = SearchRequest {
                query,
                source,
                max_results,
            };
            print_json(&api::search_fabrics(&finder, &req).await?)
        }
        Command::Patterns {
            source,
            query,
            max_results,
        } => {
            let req = SearchRequest {
                query,
                source,
                max_results,
            };
            print_json(&api::search_patterns(&finder, &req).await?)
        }
        Command::WebPatterns { query, max_results } => {
            let req = WebSearchRequest { query, max_results };
            print_json(&api::search_patterns_web(&finder, &req).await?)
        }
        Command::Detail { url } => print_json(&api::pattern_detail(&finder, &url).await?),
        Command::FromUrl { url } => {
            print_json(&api::pattern_from_url(&finder, &UrlRequest { url }).await?)
        }
        Command::Materials { url } => {
            print_json(&api::pattern_materials(&finder, &UrlRequest { url }).await?)
        }
        Command::Collection { key } => print_json(&api::pattern_collection(&finder, &key).await?),
        Command::Nearby { lat, lon, radius } => {
            let stores = NearbyStores::from_config(config)?;
            let req = LocationRequest {
                lat,
                lon,
                radius_m: radius,
            };
            print_json(&api::nearby_stores(&stores, &req).await?)
        }
        Command::FindMaterials { materials } => {
            print_json(&api::find_materials(&finder, &MaterialsRequest { materials }).await?)
        }
        Command::Project { command } => {
            let db = Database::new(&config.database_url).await?;
            run_project(&db, command).await
        }
    }
}

async fn run_project(db: &Database, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List => print_json(&api::list_projects(db).await?),
        ProjectCommand::Create {
            name,
            description,
            budget,
        } => {
            let new = NewProject {
                name,
                description,
                budget,
            };
            print_json(&api::create_project(db, &new).await?)
        }
        ProjectCommand::Show { id } => print_json(&api::get_project(db, id).await?),
        ProjectCommand::Delete { id } => print_json(&api::delete_project(db, id).await?),

        ProjectCommand::Checklist { project_id } => {
            print_json(&api::list_checklist(db, project_id).await?)
        }
        ProjectCommand::AddItem {
            project_id,
            title,
            notes,
        } => {
            let new = NewChecklistItem { title, notes };
            print_json(&api::add_checklist_item(db, project_id, &new).await?)
        }
        ProjectCommand::ToggleItem {
            project_id,
            item_id,
        } => print_json(&api::toggle_checklist_item(db, project_id, item_id).await?),
        ProjectCommand::DeleteItem {
            project_id,
            item_id,
        } => print_json(&api::delete_checklist_item(db, project_id, item_id).await?),

        ProjectCommand::SavedPatterns { project_id } => {
            print_json(&api::list_saved_patterns(db, project_id).await?)
        }
        ProjectCommand::SavePattern {
            project_id,
            url,
            title,
            source,
            image_url,
            price,
        } => {
            let new = NewSavedPattern {
                source,
                title,
                url,
                image_url,
                price,
            };
            print_json(&api::save_pattern(db, project_id, &new).await?)
        }
        ProjectCommand::DeletePattern {
            project_id,
            pattern_id,
        } => print_json(&api::delete_saved_pattern(db, project_id, pattern_id).await?),

        ProjectCommand::Materials { project_id } => {
            print_json(&api::list_materials(db, project_id).await?)
        }
        ProjectCommand::AddMaterial {
            project_id,
            name,
            quantity,
            notes,
        } => {
            let new = NewProjectMaterial {
                name,
                quantity,
                notes,
            };
            print_json(&api::add_material(db, project_id, &new).await?)
        }
        ProjectCommand::ToggleMaterial {
            project_id,
            material_id,
        } => print_json(&api::toggle_material_purchased(db, project_id, material_id).await?),
        ProjectCommand::DeleteMaterial {
            project_id,
            material_id,
        } => print_json(&api::delete_material(db, project_id, material_id).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
