//! Fuzz target: `messages::decode`
//!
//! Drives arbitrary topic/payload combinations into the inbound message
//! decoder and asserts that it never panics — malformed frames must be
//! reported as errors, not crash the device.
//!
//! cargo fuzz run fuzz_message_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use parcelbutton::messages;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    // First byte selects the topic; the remainder is the raw payload.
    let topic = match selector % 3 {
        0 => messages::TOPIC_PACKAGE_EXISTS,
        1 => messages::TOPIC_USER_HANDLED,
        _ => "unrelated/topic",
    };

    let _ = messages::decode(topic, payload);
});
