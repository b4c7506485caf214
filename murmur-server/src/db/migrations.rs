//! Migration code

use anyhow::{anyhow, Context, Result};
use diesel::{
    migration::{Migration, MigrationSource},
    pg::Pg,
    Connection,
};
use diesel_async::{async_connection_wrapper::AsyncConnectionWrapper, AsyncPgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Embed migrations into binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Run pending migrations against the database at `url`.
///
/// The harness is synchronous, so it drives an [AsyncConnectionWrapper]
/// from a blocking task.
pub async fn run(url: &str) -> Result<()> {
    let url = url.to_string();

    let applied = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)
            .context("Failed to connect to the database for migrations")?;

        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("Failed to run migrations: {e}"))?;

        Ok(versions.iter().map(ToString::to_string).collect())
    })
    .await??;

    for version in applied {
        tracing::info!(%version, "Applied migration");
    }

    Ok(())
}

/// The version of the newest embedded migration.
pub fn latest_version() -> Result<Option<String>> {
    let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS)
        .map_err(|e| anyhow!("Failed to read embedded migrations: {e}"))?;

    Ok(migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn test_latest_version_is_newest_migration() -> TestResult {
        let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS)
            .map_err(|e| anyhow!("{e}"))?;
        assert_eq!(migrations.len(), 3);

        let latest = latest_version()?.ok_or("no migrations embedded")?;
        assert!(latest.ends_with("000003"), "unexpected version {latest}");

        Ok(())
    }
}
