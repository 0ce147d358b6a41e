use hrdb_core::identity_map::IdentityMap;
use hrdb_store::{schema, DepartmentRepo, EmployeeRepo};
use rusqlite::Connection;

/// Open an in-memory database with all three tables
#[allow(dead_code)]
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    schema::create_all(&conn).unwrap();
    conn
}

/// Seed one department and return its id
#[allow(dead_code)]
pub fn seed_department(conn: &Connection, map: &mut IdentityMap) -> i64 {
    let dept = DepartmentRepo::create(conn, map, "Engineering", "Building A").unwrap();
    let id = dept.borrow().id().unwrap();
    id
}

/// Seed a department and one employee in it; returns (department_id, employee_id)
#[allow(dead_code)]
pub fn seed_employee(conn: &Connection, map: &mut IdentityMap) -> (i64, i64) {
    let department_id = seed_department(conn, map);
    let employee = EmployeeRepo::create(conn, map, "Alice", "Engineer", department_id).unwrap();
    let employee_id = employee.borrow().id().unwrap();
    (department_id, employee_id)
}

/// Count rows in a table
#[allow(dead_code)]
pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
