//! Hydration layer - maps query results through the identity map
//!
//! Each repository supplies a row mapper; these helpers run the query and
//! hand every raw row to [`EntityCache::hydrate`], so rows already cached
//! come back as the same shared instance.

use crate::errors::{from_rusqlite, Result};
use hrdb_core::identity_map::{Cached, IdentityMap, Shared};
use rusqlite::{Connection, OptionalExtension, Params, Row};

/// Row mapper signature: column values in table order
pub type RowMapper<R> = fn(&Row<'_>) -> rusqlite::Result<R>;

/// Run a single-row query and hydrate the result, if any
pub fn fetch_one<T, P>(
    conn: &Connection,
    map: &mut IdentityMap,
    sql: &str,
    params: P,
    mapper: RowMapper<T::Row>,
) -> Result<Option<Shared<T>>>
where
    T: Cached,
    P: Params,
{
    let row = conn
        .query_row(sql, params, mapper)
        .optional()
        .map_err(from_rusqlite)?;

    match row {
        Some(row) => Ok(Some(map.cache_mut::<T>().hydrate(row)?)),
        None => {
            tracing::debug!(table = T::KIND, "no matching row");
            Ok(None)
        }
    }
}

/// Run a multi-row query and hydrate every result in order
pub fn fetch_all<T, P>(
    conn: &Connection,
    map: &mut IdentityMap,
    sql: &str,
    params: P,
    mapper: RowMapper<T::Row>,
) -> Result<Vec<Shared<T>>>
where
    T: Cached,
    P: Params,
{
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, mapper)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    tracing::debug!(table = T::KIND, row_count = rows.len(), "rows fetched");

    let cache = map.cache_mut::<T>();
    rows.into_iter().map(|row| cache.hydrate(row)).collect()
}
