//! Subcommand implementations and the helpers they share.

pub mod demo;
pub mod list;
pub mod ping;

use rusqlite::Connection;
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use university_core::{
    open_db, open_db_in_memory, seed_university, ReadOnlyRepository, SqliteStaffRepository,
};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Global options every subcommand sees.
#[derive(Debug)]
pub struct Context {
    pub db: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    pub fn open_store(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        let conn = match &self.db {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };
        Ok(conn)
    }

    pub fn output(&self) -> Output {
        Output {
            json: self.json,
            sections: Vec::new(),
        }
    }
}

/// Seeds the demonstration data unless staff rows already exist.
/// Returns whether seeding ran.
pub fn seed_if_empty(conn: &mut Connection) -> Result<bool, Box<dyn std::error::Error>> {
    let existing = SqliteStaffRepository::try_new(conn)?.count()?;
    if existing > 0 {
        return Ok(false);
    }
    seed_university(conn)?;
    Ok(true)
}

#[derive(Debug, Serialize)]
struct Section {
    title: String,
    items: Vec<serde_json::Value>,
}

/// Collects titled result sections; text mode prints as it goes, JSON mode
/// prints one document at the end.
pub struct Output {
    json: bool,
    sections: Vec<Section>,
}

impl Output {
    pub fn section<T>(&mut self, title: &str, items: &[T]) -> CommandResult
    where
        T: Serialize + Display,
    {
        if self.json {
            let items = items
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?;
            self.sections.push(Section {
                title: title.to_string(),
                items,
            });
        } else {
            println!("\n*************{title}*************");
            for item in items {
                println!("{item}");
            }
        }
        Ok(())
    }

    pub fn item<T>(&mut self, title: &str, item: Option<&T>) -> CommandResult
    where
        T: Serialize + Display,
    {
        match item {
            Some(item) => self.section(title, std::slice::from_ref(item)),
            None => self.section::<T>(title, &[]),
        }
    }

    pub fn finish(self) -> CommandResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&self.sections)?);
        }
        Ok(())
    }
}
