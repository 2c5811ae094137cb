#![no_main]
use leadsift::store::MemoryStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 { return; }
    let store = MemoryStore::new();
    let _ = store.load_reader(data);
});
