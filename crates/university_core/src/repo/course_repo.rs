//! Course table mapping, finders and the `CourseView` projection.
//!
//! # Responsibility
//! - Map `Course` to the `course` row plus its `course_prerequisite` rows.
//! - Provide derived finders (`find_by_*`), finders with hand-written query
//!   text, the `CourseView` projections and two native SQLite queries.
//!
//! # Invariants
//! - Instructor and department references are checked by the store's
//!   foreign keys, not here.
//! - Native substring search binds the search term; `%`/`_` in the term are
//!   matched literally, ASCII case is ignored.

use super::contract::ReadOnlyRepository;
use super::error::{RepoError, RepoResult};
use super::paging::{Page, PageRequest};
use super::sqlite::{select_sql, SqliteRepository, Table};
use crate::model::course::Course;
use crate::model::id::CourseId;
use crate::model::view::CourseView;
use rusqlite::{named_params, params, Connection, Params, Row};
use std::collections::BTreeSet;

/// SQLite-backed course repository.
pub type SqliteCourseRepository<'conn> = SqliteRepository<'conn, Course>;

const COURSES_BY_CHAIR_LAST_NAME_SQL: &str = "SELECT c.*
FROM course c
WHERE c.department_id IN (
    SELECT d.id
    FROM department d
    JOIN staff chair ON chair.id = d.chair_id
    WHERE chair.last_name = :chair
)
ORDER BY c.id ASC;";

const COURSE_VIEW_SQL: &str = "SELECT
    c.name AS name,
    instructor.last_name AS instructor_last_name,
    d.name AS department_name
FROM course c
JOIN staff instructor ON instructor.id = c.instructor_id
JOIN department d ON d.id = c.department_id";

const FUZZY_NAME_SQL: &str =
    "SELECT * FROM course c WHERE name LIKE '%' || :search_name || '%' ESCAPE '\\' ORDER BY c.id ASC;";

const NATIVE_BY_DEPARTMENT_NAME_SQL: &str = "SELECT c.*
FROM course c
JOIN department d ON c.department_id = d.id
WHERE d.name = :dept_name
ORDER BY c.id ASC
LIMIT 1;";

impl Table for Course {
    type Id = CourseId;

    const NAME: &'static str = "course";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "credits", "instructor_id", "department_id"];

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("course.id"),
            "name" => Some("course.name"),
            "credits" => Some("course.credits"),
            "instructor" => Some("course.instructor_id"),
            "department" => Some("course.department_id"),
            _ => None,
        }
    }

    fn id(&self) -> Option<CourseId> {
        Course::id(self)
    }

    fn assigned(self, id: CourseId) -> Self {
        self.with_id(id)
    }

    fn from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let id: CourseId = row.get("id")?;
        let prerequisites = load_prerequisites(conn, id)?;
        let course = Course::new(
            row.get::<_, String>("name")?,
            row.get("credits")?,
            row.get("instructor_id")?,
            row.get("department_id")?,
        );
        Ok(course.with_id(id).with_prerequisites(prerequisites))
    }

    fn write(&self, conn: &Connection) -> RepoResult<CourseId> {
        let id = match Course::id(self) {
            Some(id) => {
                conn.execute(
                    "INSERT INTO course (id, name, credits, instructor_id, department_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        credits = excluded.credits,
                        instructor_id = excluded.instructor_id,
                        department_id = excluded.department_id;",
                    params![
                        id,
                        self.name(),
                        self.credits(),
                        self.instructor(),
                        self.department(),
                    ],
                )?;
                id
            }
            None => {
                conn.execute(
                    "INSERT INTO course (name, credits, instructor_id, department_id)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        self.name(),
                        self.credits(),
                        self.instructor(),
                        self.department(),
                    ],
                )?;
                CourseId::new(conn.last_insert_rowid())
            }
        };

        conn.execute(
            "DELETE FROM course_prerequisite WHERE course_id = ?1;",
            [id],
        )?;
        for prerequisite in self.prerequisites() {
            conn.execute(
                "INSERT INTO course_prerequisite (course_id, prerequisite_id) VALUES (?1, ?2);",
                params![id, prerequisite],
            )?;
        }

        Ok(id)
    }
}

/// Course finders and projections.
pub trait CourseQueryRepository: ReadOnlyRepository<Entity = Course, Id = CourseId> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Course>>;
    /// Courses of departments whose chair has the given family name.
    fn find_by_department_chair_member_last_name(&self, chair: &str)
        -> RepoResult<Vec<Course>>;
    /// Same result as the derived finder above, from hand-written query text.
    fn find_by_chair_last_name(&self, chair_last_name: &str) -> RepoResult<Vec<Course>>;
    /// Courses that list `prerequisite` among their prerequisites.
    fn find_course_by_prerequisite(&self, prerequisite: CourseId) -> RepoResult<Vec<Course>>;
    fn get_course_view(&self, course: CourseId) -> RepoResult<Option<CourseView>>;
    fn find_by_credits(&self, credits: i32) -> RepoResult<Vec<Course>>;
    fn find_by_credits_paged(
        &self,
        credits: i32,
        request: &PageRequest,
    ) -> RepoResult<Page<Course>>;
    /// `NonUniqueResult` when the department offers several courses.
    fn find_by_department_name(&self, department_name: &str) -> RepoResult<Option<Course>>;
    fn get_course_view_by_name(&self, name: &str) -> RepoResult<Option<CourseView>>;
    /// Native substring search on the course name.
    ///
    /// Matching follows SQLite `LIKE`: ASCII letters compare
    /// case-insensitively (`"programming"` finds "C Programming"), other
    /// characters compare exactly. `%` and `_` in `search_name` are literal.
    fn find_by_fuzzy_name(&self, search_name: &str) -> RepoResult<Vec<Course>>;
    /// Native join query keeping the first course of the named department.
    fn native_find_by_department_name(&self, department_name: &str)
        -> RepoResult<Option<Course>>;
}

impl CourseQueryRepository for SqliteCourseRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Course>> {
        self.single(
            &format!(
                "{} WHERE course.name = ?1 ORDER BY course.id ASC;",
                select_sql::<Course>()
            ),
            [name],
        )
    }

    fn find_by_department_chair_member_last_name(
        &self,
        chair: &str,
    ) -> RepoResult<Vec<Course>> {
        self.list(
            &format!(
                "{}
                 JOIN department ON department.id = course.department_id
                 JOIN staff ON staff.id = department.chair_id
                 WHERE staff.last_name = ?1
                 ORDER BY course.id ASC;",
                select_sql::<Course>()
            ),
            [chair],
        )
    }

    fn find_by_chair_last_name(&self, chair_last_name: &str) -> RepoResult<Vec<Course>> {
        self.list(
            COURSES_BY_CHAIR_LAST_NAME_SQL,
            named_params! { ":chair": chair_last_name },
        )
    }

    fn find_course_by_prerequisite(&self, prerequisite: CourseId) -> RepoResult<Vec<Course>> {
        self.list(
            &format!(
                "{}
                 JOIN course_prerequisite p ON p.course_id = course.id
                 WHERE p.prerequisite_id = ?1
                 ORDER BY course.id ASC;",
                select_sql::<Course>()
            ),
            [prerequisite],
        )
    }

    fn get_course_view(&self, course: CourseId) -> RepoResult<Option<CourseView>> {
        single_view(
            self.connection(),
            &format!("{COURSE_VIEW_SQL} WHERE c.id = ?1;"),
            [course],
        )
    }

    fn find_by_credits(&self, credits: i32) -> RepoResult<Vec<Course>> {
        self.list(
            &format!(
                "{} WHERE course.credits = ?1 ORDER BY course.id ASC;",
                select_sql::<Course>()
            ),
            [credits],
        )
    }

    fn find_by_credits_paged(
        &self,
        credits: i32,
        request: &PageRequest,
    ) -> RepoResult<Page<Course>> {
        self.page_where("course.credits = ?", &[credits], request)
    }

    fn find_by_department_name(&self, department_name: &str) -> RepoResult<Option<Course>> {
        self.single(
            &format!(
                "{}
                 JOIN department ON department.id = course.department_id
                 WHERE department.name = ?1
                 ORDER BY course.id ASC;",
                select_sql::<Course>()
            ),
            [department_name],
        )
    }

    fn get_course_view_by_name(&self, name: &str) -> RepoResult<Option<CourseView>> {
        single_view(
            self.connection(),
            &format!("{COURSE_VIEW_SQL} WHERE c.name = ?1 ORDER BY c.id ASC;"),
            [name],
        )
    }

    fn find_by_fuzzy_name(&self, search_name: &str) -> RepoResult<Vec<Course>> {
        let escaped = escape_like(search_name);
        self.list(
            FUZZY_NAME_SQL,
            named_params! { ":search_name": escaped },
        )
    }

    fn native_find_by_department_name(
        &self,
        department_name: &str,
    ) -> RepoResult<Option<Course>> {
        self.first(
            NATIVE_BY_DEPARTMENT_NAME_SQL,
            named_params! { ":dept_name": department_name },
        )
    }
}

fn single_view<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Option<CourseView>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut views = Vec::new();
    while let Some(row) = rows.next()? {
        views.push(CourseView::new(
            row.get::<_, String>("name")?,
            row.get::<_, String>("instructor_last_name")?,
            row.get::<_, String>("department_name")?,
        ));
    }

    match views.len() {
        0 | 1 => Ok(views.pop()),
        count => Err(RepoError::NonUniqueResult {
            entity: "course_view",
            count,
        }),
    }
}

fn load_prerequisites(conn: &Connection, course: CourseId) -> RepoResult<BTreeSet<CourseId>> {
    let mut stmt = conn.prepare(
        "SELECT prerequisite_id
         FROM course_prerequisite
         WHERE course_id = ?1;",
    )?;
    let mut rows = stmt.query([course])?;
    let mut prerequisites = BTreeSet::new();
    while let Some(row) = rows.next()? {
        prerequisites.insert(row.get(0)?);
    }
    Ok(prerequisites)
}

/// Escapes `LIKE` wildcards so the term is matched literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
