#![no_main]
use leadsift::filter::{EmailExclusion, FilterOptions, compile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    let Ok(s) = std::str::from_utf8(data) else { return };
    // Any accepted options must compile and render
    if let Ok(opts) = FilterOptions::from_query(Some(s)) {
        for policy in [EmailExclusion::Always, EmailExclusion::WhenRequested] {
            if let Ok(q) = compile(&opts, policy) {
                let _ = q.pipeline.to_json();
            }
        }
    }
});
