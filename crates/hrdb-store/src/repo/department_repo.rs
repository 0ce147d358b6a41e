//! Department persistence

use super::employee_repo::EmployeeRepo;
use super::hydration::{fetch_all, fetch_one};
use super::logged;
use crate::errors::{from_rusqlite, missing_id, Result};
use crate::schema::{execute_ddl, CREATE_DEPARTMENTS, DROP_DEPARTMENTS};
use hrdb_core::identity_map::{read, share, IdentityMap, Shared};
use hrdb_core::model::{Department, DepartmentRow, Employee};
use rusqlite::{params, Connection, Row};

const SELECT_DEPARTMENTS: &str = "SELECT id, name, location FROM departments";

fn department_row(row: &Row<'_>) -> rusqlite::Result<DepartmentRow> {
    Ok(DepartmentRow {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
    })
}

/// SQLite repository for Departments
pub struct DepartmentRepo;

impl DepartmentRepo {
    pub fn create_table(conn: &Connection) -> Result<()> {
        execute_ddl(conn, "departments", CREATE_DEPARTMENTS)
    }

    pub fn drop_table(conn: &Connection) -> Result<()> {
        execute_ddl(conn, "departments", DROP_DEPARTMENTS)
    }

    /// Build, validate and insert a new Department
    ///
    /// # Errors
    /// * `BlankField` - If name or location is blank
    /// * `Persistence` - Database error
    pub fn create(
        conn: &Connection,
        map: &mut IdentityMap,
        name: &str,
        location: &str,
    ) -> Result<Shared<Department>> {
        logged("department_create", || {
            let department = share(Department::new(name, location)?);
            Self::insert(conn, map, &department)?;
            Ok(department)
        })
    }

    pub fn save(
        conn: &Connection,
        map: &mut IdentityMap,
        department: &Shared<Department>,
    ) -> Result<()> {
        logged("department_save", || {
            let id = read(department)?.id();
            match id {
                None => Self::insert(conn, map, department),
                Some(_) => Self::update_row(conn, map, department),
            }
        })
    }

    /// # Errors
    /// * `MissingId` - If the department was never saved; no SQL is issued
    /// * `Persistence` - Database error
    pub fn update(
        conn: &Connection,
        map: &mut IdentityMap,
        department: &Shared<Department>,
    ) -> Result<()> {
        logged("department_update", || {
            if read(department)?.id().is_none() {
                return Err(missing_id("department", "update"));
            }
            Self::update_row(conn, map, department)
        })
    }

    /// Delete the row and evict the instance
    ///
    /// Employees pointing at the department keep their department_id.
    pub fn delete(
        conn: &Connection,
        map: &mut IdentityMap,
        department: &Shared<Department>,
    ) -> Result<()> {
        logged("department_delete", || {
            map.cache_mut::<Department>().delete_with(department, |id| {
                conn.execute("DELETE FROM departments WHERE id = ?1", [id])
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
    ) -> Result<Option<Shared<Department>>> {
        fetch_one::<Department, _>(
            conn,
            map,
            &format!("{} WHERE id = ?1", SELECT_DEPARTMENTS),
            [id],
            department_row,
        )
    }

    pub fn find_by_name(
        conn: &Connection,
        map: &mut IdentityMap,
        name: &str,
    ) -> Result<Option<Shared<Department>>> {
        fetch_one::<Department, _>(
            conn,
            map,
            &format!("{} WHERE name = ?1 ORDER BY id LIMIT 1", SELECT_DEPARTMENTS),
            [name],
            department_row,
        )
    }

    pub fn get_all(conn: &Connection, map: &mut IdentityMap) -> Result<Vec<Shared<Department>>> {
        fetch_all::<Department, _>(
            conn,
            map,
            &format!("{} ORDER BY id", SELECT_DEPARTMENTS),
            [],
            department_row,
        )
    }

    /// Employees assigned to this department
    ///
    /// A transient department has none and no SQL is issued.
    pub fn employees(
        conn: &Connection,
        map: &mut IdentityMap,
        department: &Shared<Department>,
    ) -> Result<Vec<Shared<Employee>>> {
        let id = read(department)?.id();
        match id {
            Some(id) => EmployeeRepo::find_by_department_id(conn, map, id),
            None => Ok(Vec::new()),
        }
    }

    fn insert(
        conn: &Connection,
        map: &mut IdentityMap,
        department: &Shared<Department>,
    ) -> Result<()> {
        map.cache_mut::<Department>().insert_with(department, |d| {
            conn.execute(
                "INSERT INTO departments (name, location) VALUES (?1, ?2)",
                params![d.name(), d.location()],
            )
            .map_err(from_rusqlite)?;
            Ok(conn.last_insert_rowid())
        })?;
        Ok(())
    }

    fn update_row(
        conn: &Connection,
        map: &mut IdentityMap,
        department: &Shared<Department>,
    ) -> Result<()> {
        map.cache_mut::<Department>().update_with(department, |id, d| {
            conn.execute(
                "UPDATE departments SET name = ?1, location = ?2 WHERE id = ?3",
                params![d.name(), d.location(), id],
            )
            .map_err(from_rusqlite)?;
            Ok(())
        })?;
        Ok(())
    }
}
