use anyhow::Result;
use iou_schema::MappedSchema;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::config::ServiceConfig;

pub async fn connect_database(config: &ServiceConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    Ok(pool)
}

/// Creates the schema's table and indexes if they are missing.
pub async fn migrate(pool: &PgPool, schema: &MappedSchema) -> Result<()> {
    let mut tx = pool.begin().await?;
    for statement in schema.create_statements() {
        sqlx::query(&statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(schema = %schema, table = schema.table, "schema applied");
    Ok(())
}
