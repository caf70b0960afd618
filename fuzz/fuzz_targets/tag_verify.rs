//! Fuzz target for tag computation and verification
//!
//! # Invariants
//!
//! - A freshly computed tag always verifies
//! - Any other candidate tag, of any length, is rejected
//! - Verification never panics on arbitrary candidate bytes

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagwire_crypto::{SharedKey, Verdict, compute_tag, verify_tag};

#[derive(Debug, Arbitrary)]
struct Scenario {
    key: [u8; 32],
    message: Vec<u8>,
    candidate: Vec<u8>,
}

fuzz_target!(|scenario: Scenario| {
    let key = SharedKey::from_bytes(scenario.key);
    let tag = compute_tag(&key, &scenario.message);

    assert_eq!(verify_tag(&key, &scenario.message, tag.as_bytes()), Verdict::Intact);

    let verdict = verify_tag(&key, &scenario.message, &scenario.candidate);
    if scenario.candidate.as_slice() != tag.as_bytes() {
        assert_eq!(verdict, Verdict::Corrupted);
    }
});
