use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use jobboard_refdata::{
    config::{database, settings},
    core::{
        categories, locations,
        lookup::NodeKey,
        purge,
        seeder::{self, SeedTarget},
        tenants,
    },
    entities::LocationType,
    errors::{Error, Result},
    seed_data::SeedData,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Seeds, purges and inspects the job board's reference data.
#[derive(Debug, Parser)]
#[command(name = "jobboard-refdata", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show row counts of the reference tables
    Status,
    /// Seed reference data (skips tables that already have rows)
    Seed {
        /// Seed only this table: tenants, categories or locations
        #[arg(long)]
        only: Option<SeedTarget>,
    },
    /// Delete all job-board data
    Purge {
        /// Confirm the destructive operation
        #[arg(long)]
        yes: bool,
    },
    /// Purge, then seed everything again
    Reset {
        /// Confirm the destructive operation
        #[arg(long)]
        yes: bool,
    },
    /// List categories
    Categories {
        /// Tenant code whose own categories are included
        #[arg(long)]
        tenant: Option<String>,
        /// Language of category names
        #[arg(long)]
        lang: Option<String>,
        /// Print the category tree instead of the flat list
        #[arg(long)]
        tree: bool,
        /// Show a single category by id or slug
        #[arg(long)]
        show: Option<String>,
    },
    /// Query locations
    Locations {
        #[command(subcommand)]
        query: LocationQuery,
        /// Tenant code to scope the query to
        #[arg(long, global = true)]
        tenant: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum LocationQuery {
    /// Flat list with parent summaries
    List {
        #[arg(long = "type")]
        location_type: Option<LocationType>,
    },
    /// Nested tree, three levels deep
    Tree,
    /// Flat list with active job counts
    Counts {
        #[arg(long = "type")]
        location_type: Option<LocationType>,
    },
    /// One location by id or slug, with parent and children
    Show { key: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load the application configuration
    let app_config = settings::load_app_configuration()?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready."))?;

    run(&db, &app_config, cli.command)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))
}

async fn run(
    db: &DatabaseConnection,
    config: &settings::AppConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Status => print_json(&seeder::status(db).await?),
        Command::Seed { only } => {
            let data = load_seed_data(config)?;
            match only {
                Some(target) => print_json(&seeder::seed_only(db, &data, target).await?),
                None => print_json(&seeder::seed_all(db, &data).await?.summaries()),
            }
        }
        Command::Purge { yes } => {
            confirm(yes, "purge")?;
            let report = purge::purge_tables(db, &config.purge.table_order()).await?;
            print_json(&report)
        }
        Command::Reset { yes } => {
            confirm(yes, "reset")?;
            let data = load_seed_data(config)?;
            let (purged, seeded) =
                seeder::reset(db, &data, &config.purge.table_order()).await?;
            for skipped in &purged.skipped {
                warn!("Table {} was not purged: {}", skipped.table, skipped.reason);
            }
            print_json(&seeded.summaries())
        }
        Command::Categories {
            tenant,
            lang,
            tree,
            show,
        } => {
            let tenant = resolve_tenant(db, tenant.as_deref()).await?;
            let language = lang
                .or_else(|| tenant.as_ref().map(|t| t.default_language.clone()))
                .unwrap_or_else(|| config.default_language.clone());
            let tenant_id = tenant.map(|t| t.id);

            if let Some(key) = show {
                let found =
                    categories::find_category(db, tenant_id, &NodeKey::parse(&key), &language)
                        .await?;
                print_json(&found)
            } else if tree {
                print_json(&categories::category_tree(db, tenant_id, &language).await?)
            } else {
                print_json(&categories::list_categories(db, tenant_id, &language).await?)
            }
        }
        Command::Locations { query, tenant } => {
            let tenant_id = resolve_tenant(db, tenant.as_deref()).await?.map(|t| t.id);
            run_location_query(db, tenant_id, query).await
        }
    }
}

async fn run_location_query(
    db: &DatabaseConnection,
    tenant_id: Option<Uuid>,
    query: LocationQuery,
) -> Result<()> {
    match query {
        LocationQuery::List { location_type } => {
            print_json(&locations::list_locations(db, tenant_id, location_type).await?)
        }
        LocationQuery::Tree => print_json(&locations::location_tree(db, tenant_id).await?),
        LocationQuery::Counts { location_type } => print_json(
            &locations::locations_with_job_counts(db, tenant_id, location_type).await?,
        ),
        LocationQuery::Show { key } => {
            let found = locations::find_location(db, tenant_id, &NodeKey::parse(&key)).await?;
            if found.is_none() {
                warn!("No location matches {key}");
            }
            print_json(&found)
        }
    }
}

async fn resolve_tenant(
    db: &DatabaseConnection,
    code: Option<&str>,
) -> Result<Option<jobboard_refdata::entities::TenantModel>> {
    match code {
        Some(code) => tenants::require_tenant(db, code).await.map(Some),
        None => Ok(None),
    }
}

fn load_seed_data(config: &settings::AppConfig) -> Result<SeedData> {
    match &config.seed_dir {
        Some(dir) => {
            info!("Loading seed data from {:?}", dir);
            SeedData::load_dir(dir)
        }
        None => SeedData::builtin(),
    }
}

fn confirm(yes: bool, action: &str) -> Result<()> {
    if yes {
        return Ok(());
    }
    Err(Error::Config {
        message: format!("{action} deletes all job-board data; re-run with --yes to confirm"),
    })
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
