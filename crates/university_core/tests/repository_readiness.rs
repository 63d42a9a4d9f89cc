use rusqlite::Connection;
use university_core::db::migrations::latest_version;
use university_core::db::open_db_in_memory;
use university_core::{
    RepoError, SqliteCourseRepository, SqliteDepartmentRepository, SqliteStaffRepository,
    SqliteStudentRepository,
};

#[test]
fn try_new_accepts_migrated_connections() {
    let conn = open_db_in_memory().unwrap();

    assert!(SqliteStudentRepository::try_new(&conn).is_ok());
    assert!(SqliteStaffRepository::try_new(&conn).is_ok());
    assert!(SqliteDepartmentRepository::try_new(&conn).is_ok());
    assert!(SqliteCourseRepository::try_new(&conn).is_ok());
}

#[test]
fn try_new_rejects_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteStudentRepository::try_new(&conn)
        .err()
        .expect("plain connection must be rejected");
    match err {
        RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        } => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn try_new_rejects_missing_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE student_course; DROP TABLE student;")
        .unwrap();

    let err = SqliteStudentRepository::try_new(&conn)
        .err()
        .expect("missing table must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("student")));
}

#[test]
fn try_new_rejects_missing_column() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         DROP TABLE staff;
         CREATE TABLE staff (id INTEGER PRIMARY KEY, first_name TEXT NOT NULL);
         PRAGMA foreign_keys = ON;",
    )
    .unwrap();

    let err = SqliteStaffRepository::try_new(&conn)
        .err()
        .expect("missing column must be rejected");
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "staff",
            column: "last_name"
        }
    ));
}

#[test]
fn corrupt_rows_surface_as_invalid_data() {
    use university_core::ReadOnlyRepository;

    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO student (first_name, last_name, full_time, age)
         VALUES ('Jane', 'Doe', 7, 20);
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();

    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let err = repo.find_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
