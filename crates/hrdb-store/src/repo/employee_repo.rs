//! Employee persistence
//!
//! `employees(id INTEGER PRIMARY KEY, name TEXT, job_title TEXT,
//! department_id INTEGER REFERENCES departments(id))`

use super::hydration::{fetch_all, fetch_one};
use super::logged;
use super::review_repo::ReviewRepo;
use crate::errors::{from_rusqlite, missing_id, Result};
use crate::lookup::TableLookup;
use crate::schema::{execute_ddl, CREATE_EMPLOYEES, DROP_EMPLOYEES};
use hrdb_core::identity_map::{read, share, IdentityMap, Shared};
use hrdb_core::model::{Employee, EmployeeRow, Review};
use rusqlite::{params, Connection, Row};

const SELECT_EMPLOYEES: &str = "SELECT id, name, job_title, department_id FROM employees";

fn employee_row(row: &Row<'_>) -> rusqlite::Result<EmployeeRow> {
    Ok(EmployeeRow {
        id: row.get(0)?,
        name: row.get(1)?,
        job_title: row.get(2)?,
        department_id: row.get(3)?,
    })
}

/// SQLite repository for Employees
pub struct EmployeeRepo;

impl EmployeeRepo {
    pub fn create_table(conn: &Connection) -> Result<()> {
        execute_ddl(conn, "employees", CREATE_EMPLOYEES)
    }

    pub fn drop_table(conn: &Connection) -> Result<()> {
        execute_ddl(conn, "employees", DROP_EMPLOYEES)
    }

    /// Build, validate and insert a new Employee
    ///
    /// Validation runs before any SQL, so an invalid employee writes nothing.
    ///
    /// # Errors
    /// * `BlankField` - If name or job_title is blank
    /// * `DanglingReference` - If the department does not exist
    /// * `Persistence` - Database error
    pub fn create(
        conn: &Connection,
        map: &mut IdentityMap,
        name: &str,
        job_title: &str,
        department_id: i64,
    ) -> Result<Shared<Employee>> {
        logged("employee_create", || {
            let departments = TableLookup::departments(conn);
            let employee = share(Employee::new(name, job_title, department_id, &departments)?);
            Self::insert(conn, map, &employee)?;
            Ok(employee)
        })
    }

    /// Insert a transient Employee, or update a persisted one
    ///
    /// # Errors
    /// * `BorrowConflict` - If the employee is borrowed elsewhere; no SQL is issued
    /// * `Persistence` - Database error
    pub fn save(
        conn: &Connection,
        map: &mut IdentityMap,
        employee: &Shared<Employee>,
    ) -> Result<()> {
        logged("employee_save", || {
            let id = read(employee)?.id();
            match id {
                None => Self::insert(conn, map, employee),
                Some(_) => Self::update_row(conn, map, employee),
            }
        })
    }

    /// Write the instance's fields to its row
    ///
    /// # Errors
    /// * `MissingId` - If the employee was never saved; no SQL is issued
    /// * `Persistence` - Database error
    pub fn update(
        conn: &Connection,
        map: &mut IdentityMap,
        employee: &Shared<Employee>,
    ) -> Result<()> {
        logged("employee_update", || {
            if read(employee)?.id().is_none() {
                return Err(missing_id("employee", "update"));
            }
            Self::update_row(conn, map, employee)
        })
    }

    /// Delete the row, evict it from the identity map and clear the id
    ///
    /// A transient employee is left alone.
    ///
    /// # Errors
    /// * `BorrowConflict` - If the employee is borrowed elsewhere; no SQL is issued
    /// * `Persistence` - Database error
    pub fn delete(
        conn: &Connection,
        map: &mut IdentityMap,
        employee: &Shared<Employee>,
    ) -> Result<()> {
        logged("employee_delete", || {
            map.cache_mut::<Employee>().delete_with(employee, |id| {
                conn.execute("DELETE FROM employees WHERE id = ?1", [id])
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
    ) -> Result<Option<Shared<Employee>>> {
        fetch_one::<Employee, _>(
            conn,
            map,
            &format!("{} WHERE id = ?1", SELECT_EMPLOYEES),
            [id],
            employee_row,
        )
    }

    /// First employee (lowest id) with exactly this name
    pub fn find_by_name(
        conn: &Connection,
        map: &mut IdentityMap,
        name: &str,
    ) -> Result<Option<Shared<Employee>>> {
        fetch_one::<Employee, _>(
            conn,
            map,
            &format!("{} WHERE name = ?1 ORDER BY id LIMIT 1", SELECT_EMPLOYEES),
            [name],
            employee_row,
        )
    }

    /// Every employee, ordered by id
    pub fn get_all(conn: &Connection, map: &mut IdentityMap) -> Result<Vec<Shared<Employee>>> {
        fetch_all::<Employee, _>(
            conn,
            map,
            &format!("{} ORDER BY id", SELECT_EMPLOYEES),
            [],
            employee_row,
        )
    }

    /// Employees of one department, ordered by id
    pub fn find_by_department_id(
        conn: &Connection,
        map: &mut IdentityMap,
        department_id: i64,
    ) -> Result<Vec<Shared<Employee>>> {
        fetch_all::<Employee, _>(
            conn,
            map,
            &format!("{} WHERE department_id = ?1 ORDER BY id", SELECT_EMPLOYEES),
            [department_id],
            employee_row,
        )
    }

    /// Reviews written for this employee
    ///
    /// A transient employee has none and no SQL is issued.
    pub fn reviews(
        conn: &Connection,
        map: &mut IdentityMap,
        employee: &Shared<Employee>,
    ) -> Result<Vec<Shared<Review>>> {
        let id = read(employee)?.id();
        match id {
            Some(id) => ReviewRepo::find_by_employee_id(conn, map, id),
            None => Ok(Vec::new()),
        }
    }

    fn insert(conn: &Connection, map: &mut IdentityMap, employee: &Shared<Employee>) -> Result<()> {
        map.cache_mut::<Employee>().insert_with(employee, |e| {
            conn.execute(
                "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3)",
                params![e.name(), e.job_title(), e.department_id()],
            )
            .map_err(from_rusqlite)?;
            Ok(conn.last_insert_rowid())
        })?;
        Ok(())
    }

    fn update_row(
        conn: &Connection,
        map: &mut IdentityMap,
        employee: &Shared<Employee>,
    ) -> Result<()> {
        map.cache_mut::<Employee>().update_with(employee, |id, e| {
            conn.execute(
                "UPDATE employees SET name = ?1, job_title = ?2, department_id = ?3 WHERE id = ?4",
                params![e.name(), e.job_title(), e.department_id(), id],
            )
            .map_err(from_rusqlite)?;
            Ok(())
        })?;
        Ok(())
    }
}
