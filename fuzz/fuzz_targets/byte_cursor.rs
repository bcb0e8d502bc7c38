#![no_main]

use bytestream::ByteCursor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        let arg = usize::from(data[idx] >> 3);
        idx += 1;

        let before = cursor.position();
        let failed = match op {
            0 => cursor.read_u8().is_err(),
            1 => cursor.read_i16().is_err(),
            2 => cursor.read_u32().is_err(),
            3 => cursor.read_f32().is_err(),
            4 => cursor.read_char_array(arg).is_err(),
            5 => cursor.read_variable_array(arg % 8, arg % 5 + 1).is_err(),
            6 => cursor.skip_padding(arg).is_err(),
            _ => cursor.read_unsigned([1, 2, 4, 8][arg % 4]).is_err(),
        };
        // A failed read never moves the cursor.
        if failed {
            assert_eq!(cursor.position(), before);
        }
        assert!(cursor.position() <= data.len());
    }
});
