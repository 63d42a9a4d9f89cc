use rusqlite::Connection;
use university_core::db::open_db_in_memory;
use university_core::{
    CrudRepository, Department, Person, ReadOnlyRepository, Sort, SqliteDepartmentRepository,
    SqliteStaffRepository, Staff, StaffId,
};

#[test]
fn save_flush_and_save_and_flush_persist_departments() {
    let conn = open_db_in_memory().unwrap();
    let [jones, martin, brown] = deans(&conn);
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    repo.save(&Department::new("Humanities", jones)).unwrap();
    repo.flush().unwrap();
    let fine_arts = repo
        .save_and_flush(&Department::new("Fine Arts", martin))
        .unwrap();
    repo.save(&Department::new("Social Science", brown)).unwrap();

    assert_eq!(repo.count().unwrap(), 3);
    assert_eq!(
        department_names(&repo.find_all().unwrap()),
        ["Humanities", "Fine Arts", "Social Science"]
    );
    assert_eq!(
        repo.find_by_id(fine_arts.id().unwrap()).unwrap(),
        Some(fine_arts)
    );
}

#[test]
fn deleting_all_departments_leaves_zero() {
    let conn = open_db_in_memory().unwrap();
    let repo = three_departments(&conn);

    assert_eq!(repo.delete_all().unwrap(), 3);
    assert_eq!(repo.count().unwrap(), 0);
    assert_eq!(repo.delete_all().unwrap(), 0);
}

#[test]
fn batch_deleting_a_subset_removes_exactly_that_subset() {
    let conn = open_db_in_memory().unwrap();
    let repo = three_departments(&conn);

    let all = repo.find_all().unwrap();
    assert_eq!(repo.delete_in_batch(&all[0..1]).unwrap(), 1);

    let remaining = repo.find_all().unwrap();
    assert_eq!(remaining, all[1..].to_vec());
    assert!(!repo.exists_by_id(all[0].id().unwrap()).unwrap());

    assert_eq!(repo.delete_all_in_batch().unwrap(), 2);
    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn batch_delete_of_nothing_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = three_departments(&conn);

    assert_eq!(repo.delete_in_batch(&[]).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), 3);
}

#[test]
fn save_all_find_all_by_id_and_sorting() {
    let conn = open_db_in_memory().unwrap();
    let [jones, martin, brown] = deans(&conn);
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    let saved = repo
        .save_all(&[
            Department::new("Social Science", brown),
            Department::new("Humanities", jones),
            Department::new("Fine Arts", martin),
        ])
        .unwrap();
    assert!(saved.iter().all(|department| department.id().is_some()));

    let ids = [saved[2].id().unwrap(), saved[0].id().unwrap()];
    assert_eq!(
        department_names(&repo.find_all_by_id(&ids).unwrap()),
        ["Social Science", "Fine Arts"]
    );
    assert_eq!(
        department_names(&repo.find_all_sorted(&Sort::asc("name")).unwrap()),
        ["Fine Arts", "Humanities", "Social Science"]
    );
    assert_eq!(
        department_names(&repo.find_all_sorted(&Sort::desc("name")).unwrap()),
        ["Social Science", "Humanities", "Fine Arts"]
    );
}

#[test]
fn changing_the_chair_updates_the_row() {
    let conn = open_db_in_memory().unwrap();
    let [jones, martin, _] = deans(&conn);
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    let mut humanities = repo.save(&Department::new("Humanities", jones)).unwrap();
    humanities.set_chair(martin);
    repo.save(&humanities).unwrap();

    let loaded = repo.find_by_id(humanities.id().unwrap()).unwrap().unwrap();
    assert_eq!(loaded.chair(), martin);
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn find_page_walks_all_departments() {
    let conn = open_db_in_memory().unwrap();
    let repo = three_departments(&conn);

    let first = repo
        .find_page(&university_core::PageRequest::of(0, 2))
        .unwrap();
    assert_eq!(first.number_of_elements(), 2);
    assert_eq!(first.total_elements, 3);

    let second = repo
        .find_page(&university_core::PageRequest::of(0, 2).next())
        .unwrap();
    assert_eq!(department_names(&second.content), ["Social Science"]);
    assert!(second.is_last());
}

fn deans(conn: &Connection) -> [StaffId; 3] {
    let staff = SqliteStaffRepository::try_new(conn).unwrap();
    ["Jones", "Martin", "Brown"].map(|last_name| {
        staff
            .save(&Staff::new(Person::new("Dean", last_name)))
            .unwrap()
            .id()
            .unwrap()
    })
}

fn three_departments(conn: &Connection) -> SqliteDepartmentRepository<'_> {
    let [jones, martin, brown] = deans(conn);
    let repo = SqliteDepartmentRepository::try_new(conn).unwrap();
    repo.save(&Department::new("Humanities", jones)).unwrap();
    repo.save(&Department::new("Fine Arts", martin)).unwrap();
    repo.save(&Department::new("Social Science", brown)).unwrap();
    repo
}

fn department_names(departments: &[Department]) -> Vec<String> {
    departments
        .iter()
        .map(|department| department.name().to_string())
        .collect()
}
