//! Demonstration data for a fresh store.
//!
//! # Responsibility
//! - Insert a small, fixed university: staff, three departments, courses
//!   with prerequisites, and students enrolled in some of them.
//!
//! # Invariants
//! - Seeding runs in one unit of work: either everything lands or nothing.
//! - Seeding does not check for existing rows; call it on an empty store.

use crate::db::UnitOfWork;
use crate::model::course::Course;
use crate::model::department::Department;
use crate::model::id::{CourseId, DepartmentId, StaffId};
use crate::model::person::Person;
use crate::model::staff::Staff;
use crate::model::student::Student;
use crate::repo::contract::CrudRepository;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sqlite::SqliteRepository;
use log::info;
use rusqlite::Connection;

/// Everything inserted by [`seed_university`], with ids populated.
#[derive(Debug, Clone)]
pub struct UniversitySeed {
    pub staff: Vec<Staff>,
    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub students: Vec<Student>,
}

impl UniversitySeed {
    pub fn course_named(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.name() == name)
    }

    pub fn department_named(&self, name: &str) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.name() == name)
    }
}

const STAFF: &[(&str, &str)] = &[
    ("John", "Jones"),
    ("Matthew", "Martin"),
    ("James", "Brown"),
    ("Judy", "Miller"),
    ("James", "Davis"),
    ("Allison", "Moore"),
    ("Tom", "Thomas"),
    ("Graham", "Green"),
    ("Whitney", "White"),
    ("Jack", "Black"),
    ("Queen", "King"),
];

// (name, chair index into STAFF)
const DEPARTMENTS: &[(&str, usize)] = &[
    ("Humanities", 0),
    ("Natural Sciences", 1),
    ("Social Sciences", 2),
];

// (name, credits, instructor index, department index, prerequisite names)
const COURSES: &[(&str, i32, usize, usize, &[&str])] = &[
    ("English 101", 3, 3, 0, &[]),
    ("English 201", 3, 6, 0, &["English 101"]),
    ("English 202", 3, 6, 0, &["English 201"]),
    ("Chemistry", 3, 4, 1, &[]),
    ("Physics", 4, 4, 1, &["Chemistry"]),
    ("C Programming", 3, 5, 1, &[]),
    ("Advanced C Programming", 4, 5, 1, &["C Programming"]),
    ("History 101", 3, 7, 2, &[]),
    ("Anthropology", 3, 8, 2, &[]),
    ("Sociology", 3, 9, 2, &[]),
    ("Economics", 4, 10, 2, &["Sociology"]),
];

// (first, last, full_time, age, owned course names); no course appears twice
const STUDENTS: &[(&str, &str, bool, i32, &[&str])] = &[
    ("Jane", "Doe", true, 20, &["English 101", "Chemistry"]),
    ("John", "Doe", true, 22, &["History 101"]),
    ("Mike", "Smith", true, 18, &["C Programming", "English 201"]),
    ("Ally", "Kim", false, 19, &[]),
    ("Sam", "Smith", false, 25, &["Economics"]),
    ("Kate", "Smith", true, 16, &[]),
    ("Lucy", "Nguyen", true, 21, &["Anthropology", "Sociology"]),
    ("Omar", "Haddad", false, 30, &[]),
];

/// Inserts the demonstration university in a single transaction.
pub fn seed_university(conn: &mut Connection) -> RepoResult<UniversitySeed> {
    let seed = UnitOfWork::run(conn, |tx| -> RepoResult<UniversitySeed> {
        let staff_repo = SqliteRepository::<Staff>::new(tx);
        let staff = staff_repo.save_all(
            &STAFF
                .iter()
                .map(|(first, last)| Staff::new(Person::new(*first, *last)))
                .collect::<Vec<_>>(),
        )?;
        let staff_ids: Vec<StaffId> = ids(&staff, Staff::id)?;

        let department_repo = SqliteRepository::<Department>::new(tx);
        let departments = department_repo.save_all(
            &DEPARTMENTS
                .iter()
                .map(|(name, chair)| Department::new(*name, staff_ids[*chair]))
                .collect::<Vec<_>>(),
        )?;
        let department_ids: Vec<DepartmentId> = ids(&departments, Department::id)?;

        let course_repo = SqliteRepository::<Course>::new(tx);
        let mut courses: Vec<Course> = Vec::with_capacity(COURSES.len());
        for (name, credits, instructor, department, prerequisites) in COURSES {
            let mut course = Course::new(
                *name,
                *credits,
                staff_ids[*instructor],
                department_ids[*department],
            );
            for prerequisite in prerequisites.iter() {
                course.add_prerequisite(course_id(&courses, prerequisite)?);
            }
            courses.push(course_repo.save(&course)?);
        }

        let student_repo = SqliteRepository::<Student>::new(tx);
        let mut students = Vec::with_capacity(STUDENTS.len());
        for (first, last, full_time, age, enrolled) in STUDENTS {
            let mut student = Student::new(Person::new(*first, *last), *full_time, *age);
            for name in enrolled.iter() {
                student.add_course(course_id(&courses, name)?);
            }
            students.push(student_repo.save(&student)?);
        }

        Ok(UniversitySeed {
            staff,
            departments,
            courses,
            students,
        })
    })?;

    info!(
        "event=seed module=service status=ok staff={} departments={} courses={} students={}",
        seed.staff.len(),
        seed.departments.len(),
        seed.courses.len(),
        seed.students.len()
    );
    Ok(seed)
}

fn ids<T, I>(saved: &[T], id: impl Fn(&T) -> Option<I>) -> RepoResult<Vec<I>> {
    saved
        .iter()
        .map(|item| {
            id(item).ok_or_else(|| RepoError::InvalidData("saved row has no id".to_string()))
        })
        .collect()
}

fn course_id(courses: &[Course], name: &str) -> RepoResult<CourseId> {
    courses
        .iter()
        .find(|course| course.name() == name)
        .and_then(Course::id)
        .ok_or_else(|| RepoError::InvalidData(format!("seed course `{name}` is not saved yet")))
}
