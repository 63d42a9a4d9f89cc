//! Repository demonstrations.
//!
//! Usage: university [--db <PATH>] [--json] demo
//!
//! The department CRUD walk-through runs on a scratch in-memory store; every
//! other demonstration queries the selected store, seeded when empty.

use super::{seed_if_empty, CommandResult, Context, Output};
use log::info;
use rusqlite::Connection;
use university_core::{
    has_last_name, is_full_time, is_older_than, open_db_in_memory, Course, CourseQueryRepository,
    CourseView, CrudRepository, Department, DepartmentId, PageRequest, Person, Predicate,
    ReadOnlyRepository, Sort, SqliteCourseRepository, SqliteDepartmentRepository,
    SqliteStaffRepository, SqliteStudentRepository, Staff, StaffId, StudentField,
    StudentPredicateExecutor, StudentQueryRepository,
};

pub fn execute(context: &Context) -> CommandResult {
    let mut output = context.output();

    department_crud(&mut output)?;

    let mut conn = context.open_store()?;
    let seeded = seed_if_empty(&mut conn)?;
    info!("event=demo_start module=cli seeded={seeded}");

    student_finders(&conn, &mut output)?;
    predicate_queries(&conn, &mut output)?;
    course_finders(&conn, &mut output)?;
    optional_fallbacks(&conn, &mut output)?;

    output.finish()
}

/// Save, flush and the batch deletes on departments.
fn department_crud(output: &mut Output) -> CommandResult {
    let conn = open_db_in_memory()?;
    let staff = SqliteStaffRepository::new(&conn);
    let departments = SqliteDepartmentRepository::new(&conn);

    let dean_jones = staff.save(&Staff::new(Person::new("John", "Jones")))?;
    let dean_martin = staff.save(&Staff::new(Person::new("Matthew", "Martin")))?;
    let prof_brown = staff.save(&Staff::new(Person::new("James", "Brown")))?;

    departments.save(&Department::new("Humanities", saved_id(dean_jones.id())?))?;
    departments.flush()?;
    departments.save_and_flush(&Department::new("Fine Arts", saved_id(dean_martin.id())?))?;
    departments.save(&Department::new("Social Science", saved_id(prof_brown.id())?))?;
    output.section("3 Departments", &departments.find_all()?)?;

    let all = departments.find_all()?;
    departments.delete_in_batch(&all[..1.min(all.len())])?;
    output.section("1 Less Departments", &departments.find_all()?)?;

    departments.delete_all_in_batch()?;
    output.section("Zero Departments", &departments.find_all()?)?;
    Ok(())
}

fn student_finders(conn: &Connection, output: &mut Output) -> CommandResult {
    let students = SqliteStudentRepository::try_new(conn)?;

    output.section("Full time students", &students.find_by_full_time(true)?)?;
    output.section("Students aged 20", &students.find_by_age(20)?)?;
    output.section(
        "Students named Smith",
        &students.find_by_attendee_last_name("Smith")?,
    )?;
    output.item(
        "Jane Doe by first and last name",
        students
            .find_by_attendee_first_name_and_attendee_last_name("Jane", "Doe")?
            .as_ref(),
    )?;
    output.item(
        "Jane Doe by attendee",
        students
            .find_by_attendee(&Person::new("Jane", "Doe"))?
            .as_ref(),
    )?;
    output.section(
        "Students older than 18",
        &students.find_by_age_greater_than(18)?,
    )?;
    output.section(
        "Students younger than 18",
        &students.find_by_age_less_than(18)?,
    )?;
    output.section(
        "Students named 'doe' ignoring case",
        &students.find_by_attendee_last_name_ignore_case("doe")?,
    )?;
    output.section(
        "Students whose last name is like 'S%'",
        &students.find_by_attendee_last_name_like("S%")?,
    )?;
    output.item(
        "First student by last name",
        students.find_first_by_order_by_attendee_last_name_asc()?.as_ref(),
    )?;
    output.item(
        "Oldest student",
        students.find_top_by_order_by_age_desc()?.as_ref(),
    )?;
    output.section(
        "Three oldest students",
        &students.find_top3_by_order_by_age_desc()?,
    )?;
    Ok(())
}

fn predicate_queries(conn: &Connection, output: &mut Output) -> CommandResult {
    let students = SqliteStudentRepository::try_new(conn)?;

    let smith_ignore_case = Predicate::eq_ignore_case(StudentField::LastName, "SMITH");
    output.section(
        "Full time students with last name 'SMITH' older than 15",
        &students.find_all_matching(&(smith_ignore_case & is_full_time() & is_older_than(15)))?,
    )?;
    output.section(
        "Full time students OR older than 20",
        &students.find_all_matching(&(is_full_time() | is_older_than(20)))?,
    )?;
    output.section(
        "Students with last name 'Smith' older than 15",
        &students.find_all_matching(&has_last_name("Smith").and(is_older_than(15)))?,
    )?;

    let request = PageRequest::sorted(0, 3, Sort::desc("age"));
    let page = students.find_page_matching(&is_full_time(), &request)?;
    output.section(
        &format!(
            "Full time students, page {} of {} by age descending",
            page.number + 1,
            page.total_pages()
        ),
        &page.content,
    )?;
    Ok(())
}

fn course_finders(conn: &Connection, output: &mut Output) -> CommandResult {
    let courses = SqliteCourseRepository::try_new(conn)?;

    let english = courses.find_by_name("English 101")?;
    output.item("Find English 101", english.as_ref())?;
    output.section(
        "Courses in departments chaired by Jones",
        &courses.find_by_department_chair_member_last_name("Jones")?,
    )?;
    output.section(
        "Courses in departments chaired by Jones (query text)",
        &courses.find_by_chair_last_name("Jones")?,
    )?;

    if let Some(chemistry) = courses.find_by_name("Chemistry")?.and_then(|c| c.id()) {
        output.section(
            "Courses requiring Chemistry",
            &courses.find_course_by_prerequisite(chemistry)?,
        )?;
    }
    if let Some(english_id) = english.as_ref().and_then(Course::id) {
        output.item(
            "English 101 view by id",
            courses.get_course_view(english_id)?.as_ref(),
        )?;
    }

    output.section("3 credit courses", &courses.find_by_credits(3)?)?;
    let page = courses.find_by_credits_paged(3, &PageRequest::sorted(0, 4, Sort::asc("name")))?;
    output.section(
        &format!(
            "3 credit courses, first {} of {} by name",
            page.number_of_elements(),
            page.total_elements
        ),
        &page.content,
    )?;

    output.item(
        "English 101 view by name",
        courses.get_course_view_by_name("English 101")?.as_ref(),
    )?;
    output.section(
        "Courses containing 'Programming'",
        &courses.find_by_fuzzy_name("Programming")?,
    )?;
    output.item(
        "First Humanities course (native)",
        courses.native_find_by_department_name("Humanities")?.as_ref(),
    )?;
    Ok(())
}

/// Lookups that miss, and the fallbacks a caller substitutes.
fn optional_fallbacks(conn: &Connection, output: &mut Output) -> CommandResult {
    let courses = SqliteCourseRepository::try_new(conn)?;

    output.item(
        "Course in department 'Sciences'",
        courses.find_by_department_name("Sciences")?.as_ref(),
    )?;

    let view = courses
        .get_course_view_by_name("English 101")?
        .ok_or("English 101 has no course view")?;
    output.item("English 101 view", Some(&view))?;

    let fallback_view = courses
        .get_course_view_by_name("English 100")?
        .unwrap_or_else(|| CourseView::new("dummyCourse", "Bad Instructor", "No Department"));
    output.item("English 100 view or fallback", Some(&fallback_view))?;

    let fallback_course = courses
        .native_find_by_department_name("Fake Sciences")?
        .unwrap_or_else(|| {
            Course::new("Default Course", 0, StaffId::new(0), DepartmentId::new(0))
        });
    output.item("Fake Sciences course or fallback", Some(&fallback_course))?;
    Ok(())
}

fn saved_id(id: Option<StaffId>) -> Result<StaffId, Box<dyn std::error::Error>> {
    id.ok_or_else(|| "saved staff has no id".into())
}
