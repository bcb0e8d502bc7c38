#![no_main]

use codec::decode_frame;
use libfuzzer_sys::fuzz_target;
use wire::{FrameAssembler, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits::default();

    let mut assembler = FrameAssembler::new(limits);
    assembler.push(data);
    while let Some(frame) = assembler.next_frame() {
        let Ok(frame) = frame else {
            continue;
        };
        let Ok(packet) = decode_frame(&frame, &limits) else {
            continue;
        };
        // Text that fills a terminated field decodes but cannot be
        // re-encoded; everything else must survive a second pass.
        let Ok(bytes) = packet.write(&limits) else {
            continue;
        };
        let again = decode_frame(&bytes, &limits).expect("re-encoded packet decodes");
        assert_eq!(packet, again);
    }
});
