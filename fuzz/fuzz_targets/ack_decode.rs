//! Fuzz target for acknowledgment decoding
//!
//! Only the two exact acknowledgment texts decode; everything else is
//! rejected without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagwire_core::Acknowledgment;

fuzz_target!(|data: &[u8]| {
    if let Some(ack) = Acknowledgment::from_bytes(data) {
        assert_eq!(ack.to_bytes(), data);
    }
});
