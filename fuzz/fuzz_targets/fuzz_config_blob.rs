//! Fuzz target: NVS config blob decoding
//!
//! Feeds arbitrary bytes through the postcard decode + validate path that
//! `NvsConfigStore::load` uses, and asserts that every config which passes
//! validation re-encodes to a blob that decodes back to the same value.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use autowater::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = postcard::from_bytes::<SystemConfig>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }

    // A validated config must survive a save/load cycle unchanged.
    let blob = postcard::to_allocvec(&cfg).expect("encode of validated config");
    let again: SystemConfig = postcard::from_bytes(&blob).expect("decode of own encoding");
    assert_eq!(cfg, again);
    assert!(again.validate().is_ok());
});
