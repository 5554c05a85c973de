//! Demo catalog seeding command

use super::helpers::open_store;
use tripmatch_core::catalog;

/// Handle `seed`
pub async fn handle(db_path: &str) -> anyhow::Result<()> {
    let store = open_store(db_path).await?;
    let report = catalog::seed_demo(store.as_ref()).await?;

    if report.trips == 0 {
        println!("Catalog already has trips; demo data not loaded");
    } else {
        println!(
            "Seeded {} trip(s) and {} feedback event(s)",
            report.trips, report.feedback
        );
    }
    Ok(())
}
