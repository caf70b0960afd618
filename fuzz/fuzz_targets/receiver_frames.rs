//! Fuzz target for the receiver state machine
//!
//! Feeds arbitrary frame sequences to a receiver. Every frame either
//! advances the machine or returns an error; nothing panics, and the
//! receiver never records more deliveries than it expects.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagwire_core::{PeerId, Receiver, SharedKey};

#[derive(Debug, Arbitrary)]
struct Scenario {
    key: [u8; 32],
    expected: u8,
    frames: Vec<Vec<u8>>,
}

fuzz_target!(|scenario: Scenario| {
    let expected = usize::from(scenario.expected % 16);
    let mut receiver =
        Receiver::new(PeerId::new("alice"), SharedKey::from_bytes(scenario.key), expected);

    for frame in scenario.frames {
        if receiver.handle_frame(frame).is_err() {
            break;
        }
    }

    assert!(receiver.deliveries().len() <= expected);
});
