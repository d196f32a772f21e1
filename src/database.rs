// src/database.rs
//! A database handle: its identity, shared schema and a lazily loaded
//! collection of rows.

use crate::api::{Connector, DatabaseInfo, RowQuery, Transport};
use crate::error::{NotionDbError, Result};
use crate::model::{Row, Schema};
use crate::types::{DatabaseId, PageId, ValidatedUrl};
use std::sync::Arc;

/// One Notion database.
///
/// Every operation takes the connector explicitly. The local row list is
/// only filled on the first call to [`Database::rows`] and afterwards only
/// changes with what the API confirmed.
#[derive(Debug, Clone)]
pub struct Database {
    id: DatabaseId,
    title: String,
    url: Option<String>,
    schema: Arc<Schema>,
    rows: Option<Vec<Row>>,
}

impl Database {
    /// Creates a new database under `parent`.
    pub fn create<T: Transport>(
        connector: &Connector<T>,
        parent: &PageId,
        title: &str,
        schema: &Schema,
        cover: Option<&ValidatedUrl>,
    ) -> Result<Self> {
        let info = connector.create_database(parent, title, schema, cover)?;
        let mut database = Self::from_info(info);
        database.rows = Some(Vec::new());
        Ok(database)
    }

    /// Opens an existing database and reads its schema.
    pub fn open<T: Transport>(connector: &Connector<T>, id: &DatabaseId) -> Result<Self> {
        let info = connector.retrieve_database(id)?;
        log::debug!(
            "Opened database {} ('{}') with {} columns",
            info.id,
            info.title.plain_text(),
            info.schema.len()
        );
        Ok(Self::from_info(info))
    }

    fn from_info(info: DatabaseInfo) -> Self {
        Self {
            id: info.id,
            title: info.title.plain_text(),
            url: info.url,
            schema: Arc::new(info.schema),
            rows: None,
        }
    }

    pub fn id(&self) -> &DatabaseId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// An empty row bound to this database's schema.
    pub fn new_row(&self) -> Row {
        Row::with_schema(Arc::clone(&self.schema))
    }

    /// All rows, fetched on first use.
    pub fn rows<T: Transport>(&mut self, connector: &Connector<T>) -> Result<&[Row]> {
        if self.rows.is_none() {
            self.refresh_rows(connector)?;
        }
        Ok(self.rows.as_deref().unwrap_or_default())
    }

    /// Re-reads every row from the API.
    pub fn refresh_rows<T: Transport>(&mut self, connector: &Connector<T>) -> Result<&[Row]> {
        let rows = connector.query_all_rows(&self.id, &RowQuery::new(), &self.schema, None)?;
        log::debug!("Loaded {} rows of database {}", rows.len(), self.id);
        Ok(self.rows.insert(rows).as_slice())
    }

    /// Rows loaded so far, without touching the network.
    pub fn cached_rows(&self) -> Option<&[Row]> {
        self.rows.as_deref()
    }

    /// One row by page id, straight from the API.
    pub fn row<T: Transport>(&self, connector: &Connector<T>, id: &PageId) -> Result<Row> {
        connector.retrieve_row(id, Arc::clone(&self.schema))
    }

    /// Runs a filtered/sorted query over every page of results. The cached
    /// row list is left alone.
    pub fn query<T: Transport>(&self, connector: &Connector<T>, query: &RowQuery) -> Result<Vec<Row>> {
        connector.query_all_rows(&self.id, query, &self.schema, None)
    }

    /// Creates `row` in the database. Unbound rows are bound to the schema
    /// first; the stored row (with its page id) is returned.
    pub fn add_row<T: Transport>(&mut self, connector: &Connector<T>, mut row: Row) -> Result<Row> {
        if !row.is_bound() {
            row.bind(Arc::clone(&self.schema))?;
        }
        let created = connector.create_row(&self.id, &row)?;
        log::info!(
            "Added row {} to database {}",
            created.id().map(ToString::to_string).unwrap_or_default(),
            self.id
        );
        if let Some(rows) = &mut self.rows {
            rows.push(created.clone());
        }
        Ok(created)
    }

    /// Writes a changed row back and refreshes its cached copy.
    pub fn update_row<T: Transport>(&mut self, connector: &Connector<T>, row: &Row) -> Result<Row> {
        let updated = connector.update_row(row)?;
        log::info!(
            "Updated row {} of database {}",
            updated.id().map(ToString::to_string).unwrap_or_default(),
            self.id
        );
        if let Some(cached) = self
            .rows
            .as_mut()
            .and_then(|rows| rows.iter_mut().find(|r| r.id() == updated.id()))
        {
            *cached = updated.clone();
        }
        Ok(updated)
    }

    /// Archives a row and drops it from the cache. Returns the cached copy,
    /// marked archived, if there was one.
    pub fn remove_row<T: Transport>(
        &mut self,
        connector: &Connector<T>,
        id: &PageId,
    ) -> Result<Option<Row>> {
        connector.archive_row(id)?;
        log::info!("Archived row {} of database {}", id, self.id);
        let removed = self.rows.as_mut().and_then(|rows| {
            let index = rows.iter().position(|r| r.id() == Some(id))?;
            Some(rows.remove(index))
        });
        Ok(removed.map(|mut row| {
            row.set_archived(true);
            row
        }))
    }

    /// Replaces the schema, sending renamed columns by id and removed ones
    /// as deletions. Cached rows are dropped since they are bound to the old
    /// schema.
    pub fn update_schema<T: Transport>(
        &mut self,
        connector: &Connector<T>,
        schema: Schema,
        title: Option<&str>,
    ) -> Result<()> {
        if schema.title_column().is_none() {
            return Err(NotionDbError::InvalidRequest(
                "a database needs exactly one title column".to_string(),
            ));
        }
        let properties = schema.to_update_properties(Some(&self.schema));
        let info = connector.patch_database(&self.id, properties, title)?;
        log::info!(
            "Updated schema of database {} ({} columns)",
            self.id,
            info.schema.len()
        );
        self.title = info.title.plain_text();
        self.schema = Arc::new(info.schema);
        self.rows = None;
        Ok(())
    }
}
