//! Linkage check: prints the core ping answer and versions.

use super::{CommandResult, Context};
use university_core::db::migrations::current_version;

pub fn execute(context: &Context) -> CommandResult {
    let conn = context.open_store()?;
    let schema_version = current_version(&conn)?;

    if context.json {
        let report = serde_json::json!({
            "ping": university_core::ping(),
            "version": university_core::core_version(),
            "schema_version": schema_version,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("university_core ping={}", university_core::ping());
        println!("university_core version={}", university_core::core_version());
        println!("university_core schema_version={schema_version}");
    }
    Ok(())
}
