#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate ruhuff;

fuzz_target!(|data: &[u8]| {
    // first byte decides where the dictionary ends and the payload starts
    if let Some((split, rest)) = data.split_first() {
        let split = (*split as usize).min(rest.len());
        let (dictionary, payload) = rest.split_at(split);
        let _ = ruhuff::decompress(payload, dictionary);
    }
});
