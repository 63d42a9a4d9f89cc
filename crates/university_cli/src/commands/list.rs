//! Entity listings.
//!
//! Usage: university students|courses|departments [--seed] [--sort <PROPERTY>] [--desc]

use super::{seed_if_empty, CommandResult, Context};
use clap::Args;
use university_core::{
    ReadOnlyRepository, Sort, SqliteCourseRepository, SqliteDepartmentRepository,
    SqliteStudentRepository,
};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Insert the demonstration data first when the store is empty
    #[arg(long)]
    pub seed: bool,

    /// Sort property, e.g. `age` or `attendee.last_name`
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ListArgs {
    fn to_sort(&self) -> Sort {
        match (&self.sort, self.desc) {
            (Some(property), false) => Sort::asc(property.as_str()),
            (Some(property), true) => Sort::desc(property.as_str()),
            (None, _) => Sort::unsorted(),
        }
    }
}

pub fn students(context: &Context, args: &ListArgs) -> CommandResult {
    let mut conn = context.open_store()?;
    if args.seed {
        seed_if_empty(&mut conn)?;
    }
    let repo = SqliteStudentRepository::try_new(&conn)?;
    let mut output = context.output();
    output.section("Students", &repo.find_all_sorted(&args.to_sort())?)?;
    output.finish()
}

pub fn courses(context: &Context, args: &ListArgs) -> CommandResult {
    let mut conn = context.open_store()?;
    if args.seed {
        seed_if_empty(&mut conn)?;
    }
    let repo = SqliteCourseRepository::try_new(&conn)?;
    let mut output = context.output();
    output.section("Courses", &repo.find_all_sorted(&args.to_sort())?)?;
    output.finish()
}

pub fn departments(context: &Context, args: &ListArgs) -> CommandResult {
    let mut conn = context.open_store()?;
    if args.seed {
        seed_if_empty(&mut conn)?;
    }
    let repo = SqliteDepartmentRepository::try_new(&conn)?;
    let mut output = context.output();
    output.section("Departments", &repo.find_all_sorted(&args.to_sort())?)?;
    output.finish()
}
