use anyhow::{Context, Result, bail};
use iou_platform::{PgProjectionStore, ServiceConfig, connect_database, init_tracing, migrate};
use iou_schema::{IOU_SCHEMA_V1, PersistentIou, ProjectionStore};
use tracing::info;
use uuid::Uuid;

const USAGE: &str = "usage: iou-ops <migrate | show <linear-id> | lender <name> | value <min> <max>>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate,
    Show(Uuid),
    Lender(String),
    Value { min: i64, max: i64 },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            ["migrate"] => Self::Migrate,
            ["show", id] => Self::Show(id.parse::<Uuid>().context("linear-id must be a UUID")?),
            ["lender", name] => Self::Lender((*name).to_string()),
            ["value", min, max] => {
                let min: i64 = min.parse().context("min must be an integer")?;
                let max: i64 = max.parse().context("max must be an integer")?;
                if min > max {
                    bail!("min {min} is greater than max {max}");
                }
                Self::Value { min, max }
            }
            _ => bail!("{USAGE}"),
        };
        Ok(command)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("iou_ops=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = ServiceConfig::from_env()?;
    let pool = connect_database(&config).await?;

    let store = PgProjectionStore::new(pool.clone());

    let rows: Vec<PersistentIou> = match command {
        Command::Migrate => {
            migrate(&pool, &IOU_SCHEMA_V1).await?;
            return Ok(());
        }
        Command::Show(linear_id) => store.get(linear_id).await?.into_iter().collect(),
        Command::Lender(name) => store.by_lender(&name).await?,
        Command::Value { min, max } => store.by_value_range(min, max).await?,
    };

    info!(rows = rows.len(), "query complete");
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
