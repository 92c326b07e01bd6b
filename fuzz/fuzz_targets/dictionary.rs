#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate ruhuff;
use ruhuff::codebook::dictionary;

fuzz_target!(|data: &[u8]| {
    if let Ok(parsed) = dictionary::parse(data) {
        assert!(!parsed.codes.is_empty());
    }
});
