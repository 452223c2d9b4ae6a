//! sea-orm implementation of the region reference store.

use addrkit_core::{RegionRecord, RegionStore};
use addrkit_entities::regions;
use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Statement, Value,
};
use tracing::{debug, info};

use crate::convert;

const SELECT_COLUMNS: &str = "id, parent_id, region_name, region_type, alias_name";

/// Region lookups against a MySQL or PostgreSQL table.
///
/// The table name comes from configuration, so statements are built by hand
/// and decoded through the [`regions`] entity. Each lookup is a single query
/// on a pooled connection.
pub struct DatabaseRegionStore {
    db: DatabaseConnection,
    table: String,
}

impl DatabaseRegionStore {
    /// Connect and build a store over `table`.
    ///
    /// # Arguments
    /// * `database_url` - Database connection string
    /// * `table` - Region table name, optionally schema-qualified
    pub async fn connect(database_url: &str, table: &str) -> anyhow::Result<Self> {
        info!("Connecting to region database");
        let db = Database::connect(database_url).await?;
        let store = Self::new(db, table)?;
        info!("DatabaseRegionStore initialized (table={})", store.table);
        Ok(store)
    }

    /// Wrap an existing connection.
    pub fn new(db: DatabaseConnection, table: &str) -> anyhow::Result<Self> {
        let valid = !table.is_empty()
            && table.split('.').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if !valid {
            anyhow::bail!("invalid region table name: {table:?}");
        }
        Ok(Self {
            db,
            table: table.to_string(),
        })
    }

    /// Check connectivity with a trivial query.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await?;
        Ok(())
    }

    fn build_sql(&self, backend: DbBackend, columns: &[&str]) -> String {
        let quote = match backend {
            DbBackend::Postgres => '"',
            _ => '`',
        };
        let table = self
            .table
            .split('.')
            .map(|part| format!("{quote}{part}{quote}"))
            .collect::<Vec<_>>()
            .join(".");
        let conditions = columns
            .iter()
            .enumerate()
            .map(|(i, column)| match backend {
                DbBackend::Postgres => format!("{column} = ${}", i + 1),
                _ => format!("{column} = ?"),
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        format!(
            "SELECT {SELECT_COLUMNS} FROM {table} WHERE {conditions} AND is_deleted = 0 LIMIT 1"
        )
    }

    async fn fetch_one(
        &self,
        columns: &[&str],
        values: Vec<Value>,
    ) -> anyhow::Result<Option<RegionRecord>> {
        let backend = self.db.get_database_backend();
        let sql = self.build_sql(backend, columns);
        debug!("Region lookup: {sql}");

        let model = regions::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(backend, sql, values))
            .one(&self.db)
            .await?;
        Ok(model.map(convert::region_from_model))
    }
}

#[async_trait]
impl RegionStore for DatabaseRegionStore {
    async fn find_by_name_and_type(
        &self,
        name: &str,
        region_type: i32,
    ) -> anyhow::Result<Option<RegionRecord>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        // region_type first so the lookup can use its index
        self.fetch_one(
            &["region_type", "region_name"],
            vec![region_type.into(), name.into()],
        )
        .await
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<RegionRecord>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.fetch_one(&["region_name"], vec![name.into()]).await
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<RegionRecord>> {
        self.fetch_one(&["id"], vec![id.into()]).await
    }

    async fn find_by_type_and_id(
        &self,
        region_type: i32,
        id: i64,
    ) -> anyhow::Result<Option<RegionRecord>> {
        self.fetch_one(&["region_type", "id"], vec![region_type.into(), id.into()])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn model(id: i64, parent_id: Option<i64>, name: &str, region_type: i32) -> regions::Model {
        regions::Model {
            id,
            parent_id,
            region_name: name.to_string(),
            region_type,
            alias_name: None,
        }
    }

    #[test]
    fn rejects_suspicious_table_names() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        assert!(DatabaseRegionStore::new(db, "region_table; DROP TABLE x").is_err());
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        assert!(DatabaseRegionStore::new(db, "geo.region_table").is_ok());
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        assert!(DatabaseRegionStore::new(db, "").is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn sql_placeholders_follow_backend() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let store = DatabaseRegionStore::new(db, "geo.region_table").expect("valid table");

        let mysql = store.build_sql(DbBackend::MySql, &["region_type", "id"]);
        assert_eq!(
            mysql,
            "SELECT id, parent_id, region_name, region_type, alias_name FROM `geo`.`region_table` \
             WHERE region_type = ? AND id = ? AND is_deleted = 0 LIMIT 1"
        );

        let pg = store.build_sql(DbBackend::Postgres, &["region_type", "id"]);
        assert!(pg.contains("\"geo\".\"region_table\""));
        assert!(pg.contains("region_type = $1 AND id = $2"));
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn lookup_decodes_rows() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![model(440_307, Some(440_300), "龙岗区", 1003)]])
            .append_query_results([Vec::<regions::Model>::new()])
            .into_connection();
        let store = DatabaseRegionStore::new(db, "region_table").expect("valid table");

        let found = store
            .find_by_name_and_type("龙岗区", 1003)
            .await
            .expect("query should succeed")
            .expect("row should be found");
        assert_eq!(found.id, 440_307);
        assert_eq!(found.parent(), Some(440_300));

        let missing = store
            .find_by_type_and_id(1002, 1)
            .await
            .expect("query should succeed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn blank_name_skips_query() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let store = DatabaseRegionStore::new(db, "region_table").expect("valid table");
        let found = store
            .find_by_name_and_type("   ", 1004)
            .await
            .expect("blank lookup should not fail");
        assert!(found.is_none());
    }
}
