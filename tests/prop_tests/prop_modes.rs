use bson::{Document, doc};
use leadsift::filter::{EmailExclusion, FilterOptions};
use leadsift::search::LeadSearch;
use leadsift::store::MemoryStore;
use proptest::prelude::*;

const VOCAB: &[&str] = &["food", "chef", "cars", "travel", "Porn", "vegan", "art"];

fn lead_doc() -> impl Strategy<Value = Document> {
    (
        proptest::sample::subsequence(VOCAB, 0..3),
        "[a-z]{3,8}",
        0i64..10_000,
        0i64..500,
        prop_oneof![Just("0"), Just("a.jpg")],
        prop_oneof![Just("public"), Just("private")],
    )
        .prop_map(|(desc, login, fol, posts, avatar, privacy)| {
            doc! {
                "name": login.to_uppercase(),
                "desc": desc.join(" "),
                "email": "0",
                "phone": "555",
                "login": login,
                "post_cnt": posts,
                "fol_cnt": fol,
                "link": "0",
                "avatar": avatar,
                "privacy": privacy,
            }
        })
}

fn keywords() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(VOCAB, 0..3).prop_map(|v| v.into_iter().map(str::to_string).collect())
}

fn options() -> impl Strategy<Value = FilterOptions> {
    (keywords(), keywords(), proptest::option::of(0i64..5_000), proptest::option::of(0i64..200), any::<bool>(), any::<bool>())
        .prop_map(|(pos, neg, min_f, min_p, pic, private)| FilterOptions {
            positive_keywords: pos,
            negative_keywords: neg,
            min_followers: min_f,
            min_posts: min_p,
            include_profile_picture: pic,
            include_private_accounts: private,
            ..Default::default()
        })
}

fn run(docs: &[Document], opts: &FilterOptions) -> leadsift::ResultSet {
    let search = LeadSearch::new(MemoryStore::from_documents(docs.to_vec()), EmailExclusion::Always);
    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(search.run(opts)).unwrap()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 48,
        .. proptest::test_runner::Config::default()
    })]

    #[test]
    fn prop_modes_agree(docs in proptest::collection::vec(lead_doc(), 0..40), opts in options()) {
        let db = FilterOptions { filter_in_mongo: true, ..opts.clone() };
        prop_assert_eq!(run(&docs, &opts), run(&docs, &db));
    }

    #[test]
    fn prop_profile_picture_never_widens(docs in proptest::collection::vec(lead_doc(), 0..40), opts in options()) {
        let off = FilterOptions { include_profile_picture: false, ..opts.clone() };
        let on = FilterOptions { include_profile_picture: true, ..opts };
        prop_assert!(run(&docs, &on).matched() <= run(&docs, &off).matched());
    }

    #[test]
    fn prop_empty_positive_is_empty(docs in proptest::collection::vec(lead_doc(), 0..20), neg in keywords()) {
        let opts = FilterOptions { negative_keywords: neg, ..Default::default() };
        prop_assert_eq!(run(&docs, &opts).matched(), 0);
    }

    #[test]
    fn prop_counts_bounded_by_matches(docs in proptest::collection::vec(lead_doc(), 0..40), opts in options()) {
        let rs = run(&docs, &opts);
        prop_assert!(rs.phone_count as usize <= rs.matched());
        prop_assert!(rs.email_count == 0);
    }
}
