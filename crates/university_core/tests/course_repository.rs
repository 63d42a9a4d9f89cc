use rusqlite::Connection;
use university_core::db::open_db_in_memory;
use university_core::{
    seed_university, Course, CourseId, CourseQueryRepository, CourseView, CrudRepository,
    Department, PageRequest, Person, ReadOnlyRepository, RepoError, Sort, SqliteCourseRepository,
    SqliteDepartmentRepository, SqliteStaffRepository, Staff, UniversitySeed,
};

#[test]
fn course_view_by_name_joins_instructor_and_department() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let view = repo.get_course_view_by_name("English 101").unwrap().unwrap();
    assert_eq!(view, CourseView::new("English 101", "Miller", "Humanities"));
    assert!(repo.get_course_view_by_name("English 100").unwrap().is_none());
}

#[test]
fn course_view_by_id_matches_view_by_name() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let physics = course_id(&repo, "Physics");
    assert_eq!(
        repo.get_course_view(physics).unwrap(),
        repo.get_course_view_by_name("Physics").unwrap()
    );
    assert!(repo.get_course_view(CourseId::new(9_999)).unwrap().is_none());
}

#[test]
fn find_by_name_returns_the_single_match() {
    let (conn, seed) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let english = repo.find_by_name("English 101").unwrap().unwrap();
    assert_eq!(Some(&english), seed.course_named("English 101"));
    assert_eq!(english.credits(), 3);
    assert!(repo.find_by_name("Underwater Basket Weaving").unwrap().is_none());
}

#[test]
fn chair_finders_agree() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let derived = repo
        .find_by_department_chair_member_last_name("Jones")
        .unwrap();
    let by_query_text = repo.find_by_chair_last_name("Jones").unwrap();

    assert_eq!(
        course_names(&derived),
        ["English 101", "English 201", "English 202"]
    );
    assert_eq!(derived, by_query_text);
    assert!(repo.find_by_chair_last_name("Nobody").unwrap().is_empty());
}

#[test]
fn prerequisites_are_stored_and_searchable() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let chemistry = course_id(&repo, "Chemistry");
    let requiring = repo.find_course_by_prerequisite(chemistry).unwrap();
    assert_eq!(course_names(&requiring), ["Physics"]);

    let mut physics = requiring.into_iter().next().unwrap();
    assert!(physics.prerequisites().contains(&chemistry));

    let english = course_id(&repo, "English 101");
    assert!(physics.add_prerequisite(english));
    assert!(physics.remove_prerequisite(chemistry));
    repo.save(&physics).unwrap();

    let reloaded = repo.find_by_id(physics.id().unwrap()).unwrap().unwrap();
    assert_eq!(reloaded.prerequisites().iter().copied().collect::<Vec<_>>(), [english]);
    assert!(repo.find_course_by_prerequisite(chemistry).unwrap().is_empty());
}

#[test]
fn credits_finders_list_and_page() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    assert_eq!(
        course_names(&repo.find_by_credits(4).unwrap()),
        ["Physics", "Advanced C Programming", "Economics"]
    );

    let first = repo
        .find_by_credits_paged(3, &PageRequest::sorted(0, 3, Sort::asc("name")))
        .unwrap();
    assert_eq!(
        course_names(&first.content),
        ["Anthropology", "C Programming", "Chemistry"]
    );
    assert_eq!(first.total_elements, 8);
    assert_eq!(first.total_pages(), 3);
    assert!(first.is_first());
    assert!(first.has_next());

    let last = repo
        .find_by_credits_paged(3, &PageRequest::sorted(2, 3, Sort::asc("name")))
        .unwrap();
    assert_eq!(course_names(&last.content), ["History 101", "Sociology"]);
    assert!(last.is_last());
}

#[test]
fn paging_rejects_bad_requests() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let err = repo
        .find_by_credits_paged(3, &PageRequest::of(0, 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidPageRequest { size: 0 }));

    let err = repo
        .find_by_credits_paged(3, &PageRequest::sorted(0, 5, Sort::asc("title")))
        .unwrap_err();
    match err {
        RepoError::UnknownSortProperty { entity, property } => {
            assert_eq!(entity, "course");
            assert_eq!(property, "title");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn find_by_department_name_is_single_result() {
    let (conn, seed) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let err = repo.find_by_department_name("Humanities").unwrap_err();
    assert!(matches!(
        err,
        RepoError::NonUniqueResult {
            entity: "course",
            count: 3
        }
    ));
    assert!(repo.find_by_department_name("Sciences").unwrap().is_none());

    let chair = seed.staff[0].id().unwrap();
    let fine_arts = SqliteDepartmentRepository::new(&conn)
        .save(&Department::new("Fine Arts", chair))
        .unwrap();
    let painting = repo
        .save(&Course::new("Painting", 2, chair, fine_arts.id().unwrap()))
        .unwrap();
    assert_eq!(
        repo.find_by_department_name("Fine Arts").unwrap(),
        Some(painting)
    );
}

#[test]
fn native_department_query_keeps_the_first_course() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let first = repo
        .native_find_by_department_name("Humanities")
        .unwrap()
        .unwrap();
    assert_eq!(first.name(), "English 101");
    assert!(repo
        .native_find_by_department_name("Fake Sciences")
        .unwrap()
        .is_none());
}

#[test]
fn fuzzy_name_search_matches_substrings_literally() {
    let (conn, seed) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    assert_eq!(
        course_names(&repo.find_by_fuzzy_name("Programming").unwrap()),
        ["C Programming", "Advanced C Programming"]
    );
    assert!(repo.find_by_fuzzy_name("%").unwrap().is_empty());
    assert!(repo.find_by_fuzzy_name("_").unwrap().is_empty());

    let humanities = seed.department_named("Humanities").unwrap().id().unwrap();
    let instructor = seed.staff[3].id().unwrap();
    repo.save(&Course::new("100% Attendance", 1, instructor, humanities))
        .unwrap();
    assert_eq!(
        course_names(&repo.find_by_fuzzy_name("%").unwrap()),
        ["100% Attendance"]
    );
    assert_eq!(
        course_names(&repo.find_by_fuzzy_name("'; DROP TABLE course; --").unwrap()),
        Vec::<String>::new()
    );
    assert_eq!(repo.count().unwrap(), 12);
}

#[test]
fn fuzzy_name_search_ignores_ascii_case() {
    let (conn, _) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.find_by_fuzzy_name("programming").unwrap(),
        repo.find_by_fuzzy_name("PROGRAMMING").unwrap()
    );
    assert_eq!(
        course_names(&repo.find_by_fuzzy_name("programming").unwrap()),
        ["C Programming", "Advanced C Programming"]
    );
}

#[test]
fn deleting_a_referenced_department_is_a_constraint_violation() {
    let (conn, seed) = seeded();
    let departments = SqliteDepartmentRepository::try_new(&conn).unwrap();
    let humanities = seed.department_named("Humanities").unwrap().clone();

    let err = departments.delete(&humanities).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    assert!(departments.exists_by_id(humanities.id().unwrap()).unwrap());
}

#[test]
fn courses_need_existing_instructor_and_department() {
    let (conn, seed) = seeded();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    let staff = SqliteStaffRepository::try_new(&conn).unwrap();

    let humanities = seed.departments[0].id().unwrap();
    let orphan = staff
        .save(&Staff::new(Person::new("Orphan", "Instructor")))
        .unwrap();
    staff.delete(&orphan).unwrap();

    let err = repo
        .save(&Course::new(
            "Ghost Course",
            3,
            orphan.id().unwrap(),
            humanities,
        ))
        .unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(repo.count().unwrap(), 11);
}

fn seeded() -> (Connection, UniversitySeed) {
    let mut conn = open_db_in_memory().unwrap();
    let seed = seed_university(&mut conn).unwrap();
    (conn, seed)
}

fn course_id(repo: &SqliteCourseRepository<'_>, name: &str) -> CourseId {
    repo.find_by_name(name).unwrap().unwrap().id().unwrap()
}

fn course_names(courses: &[Course]) -> Vec<String> {
    courses
        .iter()
        .map(|course| course.name().to_string())
        .collect()
}
