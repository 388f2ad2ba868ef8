//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `shipcheck_core` linkage.
//! - Exercise the in-memory store once so schema wiring is checked too.
//! - Keep output deterministic for quick local sanity checks.

use shipcheck_core::db::open_db_in_memory;
use shipcheck_core::{built_in_checklists, SqliteKvStore};

fn main() {
    println!("shipcheck_core ping={}", shipcheck_core::ping());
    println!("shipcheck_core version={}", shipcheck_core::core_version());

    match open_db_in_memory() {
        Ok(conn) => {
            let kv = SqliteKvStore::new(&conn);
            let customs = shipcheck_core::CustomChecklistStore::new(&kv).load_all();
            println!("shipcheck_core store=ok custom_checklists={}", customs.len());
        }
        Err(err) => {
            eprintln!("shipcheck_core store=error error={err}");
            std::process::exit(1);
        }
    }

    for checklist in built_in_checklists() {
        let items: usize = checklist
            .sections
            .iter()
            .map(|section| section.items.len())
            .sum();
        println!(
            "builtin title=\"{}\" sections={} items={items}",
            checklist.title,
            checklist.sections.len()
        );
    }
}
