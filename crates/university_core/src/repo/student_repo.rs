//! Student table mapping, finders and predicate queries.
//!
//! # Responsibility
//! - Map `Student` to the `student` row plus its ordered `student_course`
//!   join rows, rebuilding the embedded attendee from flattened columns.
//! - Provide the named student finders and predicate-based queries.
//!
//! # Invariants
//! - Saving a student rewrites its whole course list in the same savepoint.
//!   Listing a course another student already owns is a constraint
//!   violation and leaves the store unchanged.
//! - The per-entity delete removes the student's courses as well; batch
//!   deletes only drop the join rows.
//! - Finders whose name carries no ordering return rows in id order.

use super::contract::ReadOnlyRepository;
use super::error::{RepoError, RepoResult};
use super::paging::{Page, PageRequest, Sort};
use super::sqlite::{order_by_clause, placeholders, select_sql, SqliteRepository, Table};
use crate::model::id::{CourseId, StudentId};
use crate::model::person::Person;
use crate::model::student::Student;
use crate::query::predicate::Predicate;
use log::debug;
use rusqlite::{params, params_from_iter, Connection, Row};

/// SQLite-backed student repository.
pub type SqliteStudentRepository<'conn> = SqliteRepository<'conn, Student>;

impl Table for Student {
    type Id = StudentId;

    const NAME: &'static str = "student";
    const COLUMNS: &'static [&'static str] = &["id", "first_name", "last_name", "full_time", "age"];

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("student.id"),
            "attendee.first_name" => Some("student.first_name"),
            "attendee.last_name" => Some("student.last_name"),
            "full_time" => Some("student.full_time"),
            "age" => Some("student.age"),
            _ => None,
        }
    }

    fn id(&self) -> Option<StudentId> {
        Student::id(self)
    }

    fn assigned(self, id: StudentId) -> Self {
        self.with_id(id)
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let id: StudentId = row.get("id")?;
        let full_time = match row.get::<_, i64>("full_time")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid full_time value `{other}` in student.full_time"
                )));
            }
        };
        let attendee = Person::new(
            row.get::<_, String>("first_name")?,
            row.get::<_, String>("last_name")?,
        );
        let courses = load_course_ids(conn, id)?;

        Ok(Student::new(attendee, full_time, row.get("age")?)
            .with_id(id)
            .with_courses(courses))
    }

    fn write(&self, conn: &Connection) -> RepoResult<StudentId> {
        let attendee = self.attendee();
        let id = match Student::id(self) {
            Some(id) => {
                conn.execute(
                    "INSERT INTO student (id, first_name, last_name, full_time, age)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        first_name = excluded.first_name,
                        last_name = excluded.last_name,
                        full_time = excluded.full_time,
                        age = excluded.age;",
                    params![
                        id,
                        attendee.first_name(),
                        attendee.last_name(),
                        self.is_full_time(),
                        self.age(),
                    ],
                )?;
                id
            }
            None => {
                conn.execute(
                    "INSERT INTO student (first_name, last_name, full_time, age)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        attendee.first_name(),
                        attendee.last_name(),
                        self.is_full_time(),
                        self.age(),
                    ],
                )?;
                StudentId::new(conn.last_insert_rowid())
            }
        };

        conn.execute("DELETE FROM student_course WHERE student_id = ?1;", [id])?;
        for (position, course) in self.courses().iter().enumerate() {
            conn.execute(
                "INSERT INTO student_course (student_id, course_id, position)
                 VALUES (?1, ?2, ?3);",
                params![id, course, position as i64],
            )?;
        }

        Ok(id)
    }

    fn delete_row(conn: &Connection, id: StudentId) -> RepoResult<usize> {
        let owned = load_course_ids(conn, id)?;
        let changed = conn.execute("DELETE FROM student WHERE id = ?1;", [id])?;
        if !owned.is_empty() {
            let removed = conn.execute(
                &format!(
                    "DELETE FROM course WHERE id IN ({});",
                    placeholders(owned.len())
                ),
                params_from_iter(owned.iter()),
            )?;
            debug!(
                "event=repo_cascade module=repo entity=student id={} courses_removed={}",
                id, removed
            );
        }
        Ok(changed)
    }
}

/// Named student finders. The method name states filter, operator and order.
pub trait StudentQueryRepository: ReadOnlyRepository<Entity = Student, Id = StudentId> {
    fn find_by_full_time(&self, full_time: bool) -> RepoResult<Vec<Student>>;
    fn find_by_age(&self, age: i32) -> RepoResult<Vec<Student>>;
    fn find_by_attendee_last_name(&self, last_name: &str) -> RepoResult<Vec<Student>>;
    /// `None` when nobody matches, `NonUniqueResult` when several do.
    fn find_by_attendee_first_name_and_attendee_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Student>>;
    /// Same result as matching first and last name separately.
    fn find_by_attendee(&self, person: &Person) -> RepoResult<Option<Student>>;
    fn find_by_age_greater_than(&self, minimum_age: i32) -> RepoResult<Vec<Student>>;
    fn find_by_age_less_than(&self, maximum_age: i32) -> RepoResult<Vec<Student>>;
    fn find_by_attendee_last_name_ignore_case(&self, last_name: &str)
        -> RepoResult<Vec<Student>>;
    /// `pattern` is a SQL `LIKE` pattern; the caller supplies `%`/`_`.
    fn find_by_attendee_last_name_like(&self, pattern: &str) -> RepoResult<Vec<Student>>;
    /// First student alphabetically by family name.
    fn find_first_by_order_by_attendee_last_name_asc(&self) -> RepoResult<Option<Student>>;
    /// Oldest student.
    fn find_top_by_order_by_age_desc(&self) -> RepoResult<Option<Student>>;
    /// Up to three oldest students, oldest first.
    fn find_top3_by_order_by_age_desc(&self) -> RepoResult<Vec<Student>>;
}

/// Queries driven by a caller-built [`Predicate`].
pub trait StudentPredicateExecutor {
    /// `None` when nobody matches, `NonUniqueResult` when several do.
    fn find_one_matching(&self, predicate: &Predicate) -> RepoResult<Option<Student>>;
    fn find_all_matching(&self, predicate: &Predicate) -> RepoResult<Vec<Student>>;
    fn find_all_matching_sorted(
        &self,
        predicate: &Predicate,
        sort: &Sort,
    ) -> RepoResult<Vec<Student>>;
    fn find_page_matching(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Student>>;
    fn count_matching(&self, predicate: &Predicate) -> RepoResult<u64>;
    fn exists_matching(&self, predicate: &Predicate) -> RepoResult<bool>;
}

impl StudentQueryRepository for SqliteStudentRepository<'_> {
    fn find_by_full_time(&self, full_time: bool) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE student.full_time = ?1 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [full_time],
        )
    }

    fn find_by_age(&self, age: i32) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE student.age = ?1 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [age],
        )
    }

    fn find_by_attendee_last_name(&self, last_name: &str) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE student.last_name = ?1 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [last_name],
        )
    }

    fn find_by_attendee_first_name_and_attendee_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Student>> {
        self.single(
            &format!(
                "{} WHERE student.first_name = ?1 AND student.last_name = ?2
                 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [first_name, last_name],
        )
    }

    fn find_by_attendee(&self, person: &Person) -> RepoResult<Option<Student>> {
        self.find_by_attendee_first_name_and_attendee_last_name(
            person.first_name(),
            person.last_name(),
        )
    }

    fn find_by_age_greater_than(&self, minimum_age: i32) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE student.age > ?1 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [minimum_age],
        )
    }

    fn find_by_age_less_than(&self, maximum_age: i32) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE student.age < ?1 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [maximum_age],
        )
    }

    fn find_by_attendee_last_name_ignore_case(
        &self,
        last_name: &str,
    ) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE upper(student.last_name) = upper(?1) ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [last_name],
        )
    }

    fn find_by_attendee_last_name_like(&self, pattern: &str) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} WHERE student.last_name LIKE ?1 ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            [pattern],
        )
    }

    fn find_first_by_order_by_attendee_last_name_asc(&self) -> RepoResult<Option<Student>> {
        self.first(
            &format!(
                "{} ORDER BY student.last_name ASC, student.id ASC LIMIT 1;",
                select_sql::<Student>()
            ),
            [],
        )
    }

    fn find_top_by_order_by_age_desc(&self) -> RepoResult<Option<Student>> {
        self.first(
            &format!(
                "{} ORDER BY student.age DESC, student.id ASC LIMIT 1;",
                select_sql::<Student>()
            ),
            [],
        )
    }

    fn find_top3_by_order_by_age_desc(&self) -> RepoResult<Vec<Student>> {
        self.list(
            &format!(
                "{} ORDER BY student.age DESC, student.id ASC LIMIT 3;",
                select_sql::<Student>()
            ),
            [],
        )
    }
}

impl StudentPredicateExecutor for SqliteStudentRepository<'_> {
    fn find_one_matching(&self, predicate: &Predicate) -> RepoResult<Option<Student>> {
        let (filter, binds) = predicate.to_sql();
        self.single(
            &format!(
                "{} WHERE {filter} ORDER BY student.id ASC;",
                select_sql::<Student>()
            ),
            params_from_iter(binds.iter()),
        )
    }

    fn find_all_matching(&self, predicate: &Predicate) -> RepoResult<Vec<Student>> {
        self.find_all_matching_sorted(predicate, &Sort::unsorted())
    }

    fn find_all_matching_sorted(
        &self,
        predicate: &Predicate,
        sort: &Sort,
    ) -> RepoResult<Vec<Student>> {
        let (filter, binds) = predicate.to_sql();
        let order = order_by_clause::<Student>(sort)?;
        self.list(
            &format!("{} WHERE {filter}{order};", select_sql::<Student>()),
            params_from_iter(binds.iter()),
        )
    }

    fn find_page_matching(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Student>> {
        let (filter, binds) = predicate.to_sql();
        self.page_where(&filter, &binds, request)
    }

    fn count_matching(&self, predicate: &Predicate) -> RepoResult<u64> {
        let (filter, binds) = predicate.to_sql();
        self.count_where(&filter, params_from_iter(binds.iter()))
    }

    fn exists_matching(&self, predicate: &Predicate) -> RepoResult<bool> {
        Ok(self.count_matching(predicate)? > 0)
    }
}

fn load_course_ids(conn: &Connection, student: StudentId) -> RepoResult<Vec<CourseId>> {
    let mut stmt = conn.prepare(
        "SELECT course_id
         FROM student_course
         WHERE student_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([student])?;
    let mut courses = Vec::new();
    while let Some(row) = rows.next()? {
        courses.push(row.get(0)?);
    }
    Ok(courses)
}
