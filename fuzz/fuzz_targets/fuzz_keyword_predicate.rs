#![no_main]
use arbitrary::Arbitrary;
use leadsift::LeadDocument;
use leadsift::filter::KeywordPredicate;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    positive: Vec<String>,
    negative: Vec<String>,
    desc: String,
    login: String,
    name: String,
}

fuzz_target!(|input: Input| {
    if input.positive.len() + input.negative.len() > 64 { return; }
    let Ok(p) = KeywordPredicate::new(input.positive.as_slice(), input.negative.as_slice()) else { return };
    let doc = LeadDocument { desc: input.desc, login: input.login, name: input.name, ..Default::default() };
    let upper = LeadDocument {
        desc: doc.desc.to_uppercase(),
        login: doc.login.to_uppercase(),
        name: doc.name.to_uppercase(),
        ..Default::default()
    };
    let _ = p.accepts(&doc);
    let _ = p.accepts(&upper);
});
