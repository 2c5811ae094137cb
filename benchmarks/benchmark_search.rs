mod synthetic_data;

use leadsift::filter::{EmailExclusion, FilterOptions};
use leadsift::search::LeadSearch;
use leadsift::store::MemoryStore;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let total: usize = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(200_000);
    let t = Instant::now();
    let store = match std::env::var("LEADSIFT_BENCH_FILE") {
        Ok(path) => MemoryStore::load_file(&synthetic_data::ensure_ndjson(&path, total)?)?,
        Err(_) => MemoryStore::from_documents(synthetic_data::generate(total)),
    };
    println!("prepared {} leads in {:?}", store.len(), t.elapsed());

    let search = LeadSearch::new(store, EmailExclusion::Always);
    let base = FilterOptions {
        min_followers: Some(1_000),
        max_followers: Some(40_000),
        min_posts: Some(5),
        positive_keywords: vec!["food".into(), "chef".into()],
        negative_keywords: vec!["cars".into()],
        exclude_sexual_content: true,
        ..Default::default()
    };
    for filter_in_mongo in [false, true] {
        let opts = FilterOptions { filter_in_mongo, ..base.clone() };
        let t = Instant::now();
        let rs = search.run(&opts).await?;
        println!(
            "{:<12} matched={:<7} phones={:<7} emails={:<7} elapsed={:?}",
            if filter_in_mongo { "database" } else { "application" },
            rs.matched(),
            rs.phone_count,
            rs.email_count,
            t.elapsed()
        );
    }
    Ok(())
}
