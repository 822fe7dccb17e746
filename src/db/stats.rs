use crate::db::pool::DbPool;
use crate::db::queries::{count_by_collection, current_revision};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub fn print_db_info(pool: &DbPool) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(&pool.path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, pool.path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) DOCUMENTS PER COLLECTION
    //
    let per_collection = count_by_collection(&pool.conn)?;
    let total: i64 = per_collection.iter().map(|(_, n)| n).sum();

    println!("{}• Total documents:{} {}{}{}", CYAN, RESET, GREEN, total, RESET);
    if per_collection.is_empty() {
        println!("    {GREY}--{RESET}");
    }
    for (collection, n) in &per_collection {
        println!("    {collection}: {n}");
    }

    //
    // 3) REVISION / MIGRATIONS
    //
    let revision = current_revision(&pool.conn)?;
    let migrations: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Revision:{} {}", CYAN, RESET, revision);
    println!("{}• Migrations applied:{} {}", CYAN, RESET, migrations);

    println!();
    Ok(())
}
