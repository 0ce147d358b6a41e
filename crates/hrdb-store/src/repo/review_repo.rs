//! Review persistence
//!
//! `reviews(id INTEGER PRIMARY KEY, year INTEGER, summary TEXT,
//! employee_id INTEGER REFERENCES employees(id))`

use super::hydration::{fetch_all, fetch_one};
use super::logged;
use crate::errors::{from_rusqlite, missing_id, Result};
use crate::lookup::TableLookup;
use crate::schema::{execute_ddl, CREATE_REVIEWS, DROP_REVIEWS};
use hrdb_core::identity_map::{read, share, IdentityMap, Shared};
use hrdb_core::model::{Review, ReviewRow};
use rusqlite::{params, Connection, Row};

const SELECT_REVIEWS: &str = "SELECT id, year, summary, employee_id FROM reviews";

fn review_row(row: &Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok(ReviewRow {
        id: row.get(0)?,
        year: row.get(1)?,
        summary: row.get(2)?,
        employee_id: row.get(3)?,
    })
}

/// SQLite repository for Reviews
pub struct ReviewRepo;

impl ReviewRepo {
    pub fn create_table(conn: &Connection) -> Result<()> {
        execute_ddl(conn, "reviews", CREATE_REVIEWS)
    }

    pub fn drop_table(conn: &Connection) -> Result<()> {
        execute_ddl(conn, "reviews", DROP_REVIEWS)
    }

    /// Build, validate and insert a new Review
    ///
    /// # Errors
    /// * `YearOutOfRange` - If year is before 2000
    /// * `BlankField` - If summary is blank
    /// * `DanglingReference` - If the employee does not exist
    /// * `Persistence` - Database error
    pub fn create(
        conn: &Connection,
        map: &mut IdentityMap,
        year: i64,
        summary: &str,
        employee_id: i64,
    ) -> Result<Shared<Review>> {
        logged("review_create", || {
            let employees = TableLookup::employees(conn);
            let review = share(Review::new(year, summary, employee_id, &employees)?);
            Self::insert(conn, map, &review)?;
            Ok(review)
        })
    }

    /// Insert a transient Review, or update a persisted one
    pub fn save(conn: &Connection, map: &mut IdentityMap, review: &Shared<Review>) -> Result<()> {
        logged("review_save", || {
            let id = read(review)?.id();
            match id {
                None => Self::insert(conn, map, review),
                Some(_) => Self::update_row(conn, map, review),
            }
        })
    }

    /// # Errors
    /// * `MissingId` - If the review was never saved; no SQL is issued
    /// * `Persistence` - Database error
    pub fn update(conn: &Connection, map: &mut IdentityMap, review: &Shared<Review>) -> Result<()> {
        logged("review_update", || {
            if read(review)?.id().is_none() {
                return Err(missing_id("review", "update"));
            }
            Self::update_row(conn, map, review)
        })
    }

    /// Delete the row, evict it from the identity map and clear the id
    pub fn delete(conn: &Connection, map: &mut IdentityMap, review: &Shared<Review>) -> Result<()> {
        logged("review_delete", || {
            map.cache_mut::<Review>().delete_with(review, |id| {
                conn.execute("DELETE FROM reviews WHERE id = ?1", [id])
                    .map_err(from_rusqlite)?;
                Ok(())
            })?;
            Ok(())
        })
    }

    pub fn find_by_id(
        conn: &Connection,
        map: &mut IdentityMap,
        id: i64,
    ) -> Result<Option<Shared<Review>>> {
        fetch_one::<Review, _>(
            conn,
            map,
            &format!("{} WHERE id = ?1", SELECT_REVIEWS),
            [id],
            review_row,
        )
    }

    pub fn get_all(conn: &Connection, map: &mut IdentityMap) -> Result<Vec<Shared<Review>>> {
        fetch_all::<Review, _>(
            conn,
            map,
            &format!("{} ORDER BY id", SELECT_REVIEWS),
            [],
            review_row,
        )
    }

    /// Reviews for one employee, ordered by id
    pub fn find_by_employee_id(
        conn: &Connection,
        map: &mut IdentityMap,
        employee_id: i64,
    ) -> Result<Vec<Shared<Review>>> {
        fetch_all::<Review, _>(
            conn,
            map,
            &format!("{} WHERE employee_id = ?1 ORDER BY id", SELECT_REVIEWS),
            [employee_id],
            review_row,
        )
    }

    fn insert(conn: &Connection, map: &mut IdentityMap, review: &Shared<Review>) -> Result<()> {
        map.cache_mut::<Review>().insert_with(review, |r| {
            conn.execute(
                "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3)",
                params![r.year(), r.summary(), r.employee_id()],
            )
            .map_err(from_rusqlite)?;
            Ok(conn.last_insert_rowid())
        })?;
        Ok(())
    }

    fn update_row(conn: &Connection, map: &mut IdentityMap, review: &Shared<Review>) -> Result<()> {
        map.cache_mut::<Review>().update_with(review, |id, r| {
            conn.execute(
                "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4",
                params![r.year(), r.summary(), r.employee_id(), id],
            )
            .map_err(from_rusqlite)?;
            Ok(())
        })?;
        Ok(())
    }
}
