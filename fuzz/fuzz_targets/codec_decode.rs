#![no_main]

use libfuzzer_sys::fuzz_target;
use recuerdo::codec::{JsonCodec, MsgpackCodec, SampleCodec};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must return an error, never panic,
    // whichever codec a store manifest claims
    let _ = JsonCodec.decode(data);
    let _ = MsgpackCodec.decode(data);
});
