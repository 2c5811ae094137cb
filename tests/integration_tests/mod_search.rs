use super::_support::*;
use bson::doc;
use leadsift::assemble::ResultSet;
use leadsift::errors::LeadsError;
use leadsift::filter::{EmailExclusion, FilterOptions};
use leadsift::search::LeadSearch;
use leadsift::store::MemoryStore;
use leadsift::types::LeadDocument;
use leadsift::utils::devlog;

#[tokio::test]
async fn food_scenario_includes_chef() {
    let s = memory_search(EmailExclusion::Always);
    let rs = s.run(&scenario_options()).await.unwrap();
    assert_eq!(logins(&rs.results), vec!["chef", "dana_eats", "mine", "lewd"]);
    assert_eq!(rs.phone_count, 2);
    assert_eq!(rs.email_count, 2);
    let chef = &rs.results[0];
    assert_eq!(chef.fol_cnt, 2000);
    assert_eq!(chef.name, "Chef Joe");
}

#[tokio::test]
async fn negative_keyword_wins_over_positive() {
    let mut d = chef();
    d.insert("desc", "I love food and porn");
    let s = LeadSearch::new(MemoryStore::from_documents(vec![d]), EmailExclusion::Always);
    for filter_in_mongo in [false, true] {
        let opts = FilterOptions { filter_in_mongo, ..scenario_options() };
        assert_eq!(s.run(&opts).await.unwrap().matched(), 0);
    }
}

#[tokio::test]
async fn defaults_match_nothing() {
    let s = memory_search(EmailExclusion::Always);
    let opts = FilterOptions::from_query(None).unwrap();
    assert_eq!(s.run(&opts).await.unwrap(), ResultSet::default());
}

#[tokio::test]
async fn adult_vocabulary_excludes() {
    let s = memory_search(EmailExclusion::Always);
    let opts = FilterOptions { exclude_sexual_content: true, ..scenario_options() };
    let rs = s.run(&opts).await.unwrap();
    assert_eq!(logins(&rs.results), vec!["chef", "dana_eats", "mine"]);
}

#[tokio::test]
async fn sentinel_toggles_narrow() {
    let s = memory_search(EmailExclusion::Always);
    let pic = FilterOptions { include_profile_picture: true, ..scenario_options() };
    // a missing avatar is not the placeholder
    assert_eq!(logins(&s.run(&pic).await.unwrap().results), vec!["chef", "dana_eats", "lewd"]);
    let link = FilterOptions { include_website_link: true, ..scenario_options() };
    assert_eq!(logins(&s.run(&link).await.unwrap().results), vec!["dana_eats"]);
    let private = FilterOptions { include_private_accounts: true, ..scenario_options() };
    assert_eq!(s.run(&private).await.unwrap().matched(), 5);
}

#[tokio::test]
async fn bounds_are_inclusive_in_both_modes() {
    let edge = |login: &str, fol: i64, posts: i64| {
        doc! { "name": login, "desc": "food", "email": "0", "phone": "0", "login": login,
               "post_cnt": posts, "fol_cnt": fol, "link": "0" }
    };
    let store = MemoryStore::from_documents(vec![
        edge("f999", 999, 10),
        edge("f1000", 1000, 10),
        edge("f5000", 5000, 10),
        edge("f5001", 5001, 10),
        edge("p9", 3000, 9),
        edge("p10", 3000, 10),
    ]);
    let s = LeadSearch::new(store, EmailExclusion::Always);
    for filter_in_mongo in [false, true] {
        let opts = FilterOptions { filter_in_mongo, ..scenario_options() };
        let rs = s.run(&opts).await.unwrap();
        assert_eq!(logins(&rs.results), vec!["f1000", "f5000", "p10"], "filter_in_mongo={filter_in_mongo}");
    }
}

#[tokio::test]
async fn placeholder_avatar_and_bio_pass_unless_required() {
    let mut d = chef();
    d.insert("avatar", "0");
    d.insert("name", "food");
    d.insert("desc", "0");
    let s = LeadSearch::new(MemoryStore::from_documents(vec![d]), EmailExclusion::Always);
    assert_eq!(s.run(&scenario_options()).await.unwrap().matched(), 1);
    let pic = FilterOptions { include_profile_picture: true, ..scenario_options() };
    assert_eq!(s.run(&pic).await.unwrap().matched(), 0);
    let bio = FilterOptions { include_bio: true, ..scenario_options() };
    assert_eq!(s.run(&bio).await.unwrap().matched(), 0);
}

#[tokio::test]
async fn owner_email_exclusion_follows_policy() {
    let opts = FilterOptions { email: "owner@leads.io".into(), ..scenario_options() };
    let always = memory_search(EmailExclusion::Always).run(&opts).await.unwrap();
    assert!(!logins(&always.results).contains(&"mine"));

    let when_requested = memory_search(EmailExclusion::WhenRequested);
    assert!(logins(&when_requested.run(&opts).await.unwrap().results).contains(&"mine"));
    let asked = FilterOptions { exclude_exported_leads: true, ..opts };
    assert!(!logins(&when_requested.run(&asked).await.unwrap().results).contains(&"mine"));
}

#[tokio::test]
async fn numeric_strings_do_not_satisfy_range() {
    let s = memory_search(EmailExclusion::Always);
    let opts = FilterOptions {
        min_followers: Some(1000),
        positive_keywords: vec!["street".into()],
        ..Default::default()
    };
    // fol_cnt is a double and matches; no post bound so the string post_cnt is irrelevant
    let rs = s.run(&opts).await.unwrap();
    assert_eq!(logins(&rs.results), vec!["stringy"]);
    assert_eq!(rs.results[0].post_cnt, 55);
    let bounded = FilterOptions { min_posts: Some(1), ..opts };
    assert_eq!(s.run(&bounded).await.unwrap().matched(), 0);
}

#[tokio::test]
async fn both_modes_agree_on_fixture() {
    let s = memory_search(EmailExclusion::Always);
    let keyword_sets: [(&[&str], &[&str]); 4] =
        [(&["food"], &[]), (&["FOOD", "cars"], &["blog"]), (&["chef"], &["joe"]), (&["o"], &["e"])];
    for (pos, neg) in keyword_sets {
        let app = FilterOptions {
            positive_keywords: pos.iter().map(|s| s.to_string()).collect(),
            negative_keywords: neg.iter().map(|s| s.to_string()).collect(),
            include_private_accounts: true,
            ..Default::default()
        };
        let db = FilterOptions { filter_in_mongo: true, ..app.clone() };
        assert_eq!(s.run(&app).await.unwrap(), s.run(&db).await.unwrap(), "{pos:?} {neg:?}");
    }
}

#[tokio::test]
async fn output_carries_only_the_eight_fields() {
    let s = memory_search(EmailExclusion::Always);
    let rs = s.run(&FilterOptions { include_private_accounts: true, ..scenario_options() }).await.unwrap();
    let v = serde_json::to_value(&rs).unwrap();
    for row in v["results"].as_array().unwrap() {
        let mut keys: Vec<&str> = row.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["desc", "email", "fol_cnt", "link", "login", "name", "phone", "post_cnt"]);
    }
}

#[tokio::test]
async fn cursor_failure_yields_no_partial_result() {
    let docs = vec![LeadDocument { desc: "food".into(), ..Default::default() }];
    let s = LeadSearch::new(FlakyStore(docs), EmailExclusion::Always);
    let r = s.run(&scenario_options()).await;
    assert!(matches!(r, Err(LeadsError::Store(_))));
    let s = LeadSearch::new(FailingStore, EmailExclusion::Always);
    assert!(matches!(s.run(&scenario_options()).await, Err(LeadsError::Store(_))));
}

#[tokio::test]
async fn empty_positive_list_never_reaches_the_store() {
    // FailingStore would error if aggregated
    let s = LeadSearch::new(FailingStore, EmailExclusion::Always);
    for filter_in_mongo in [false, true] {
        let opts = FilterOptions { filter_in_mongo, negative_keywords: vec!["x".into()], ..Default::default() };
        assert_eq!(s.run(&opts).await.unwrap().matched(), 0);
    }
}

#[tokio::test]
async fn bench_line_reports_mode() {
    let _g = devlog::enable_thread_sink();
    let s = memory_search(EmailExclusion::Always);
    s.run(&FilterOptions { filter_in_mongo: true, ..scenario_options() }).await.unwrap();
    let lines = devlog::drain();
    assert!(lines.iter().any(|l| l.contains("mode=database") && l.contains("matched=4")), "{lines:?}");
}

#[test]
fn memory_store_loads_fixture_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leads.ndjson");
    let body: String = leads()
        .into_iter()
        .map(|d| format!("{}\n", bson::Bson::Document(d).into_relaxed_extjson()))
        .collect();
    std::fs::write(&path, body).unwrap();
    let store = MemoryStore::load_file(&path).unwrap();
    assert_eq!(store.len(), leads().len());
    store.insert(doc! { "login": "late" });
    assert_eq!(store.len(), leads().len() + 1);
}
