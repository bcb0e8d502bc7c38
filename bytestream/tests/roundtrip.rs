use bytestream::{align4, ByteCursor, ByteError, ByteWriter};

#[test]
fn count_prefixed_array_roundtrip() {
    let values = [10u16, 20];
    let mut writer = ByteWriter::new();
    writer.write_u8(values.len() as u8);
    writer
        .write_array::<u16, ByteError, _>(&values, None, 2, |inner, value| {
            inner.write_u16(*value);
            Ok(())
        })
        .unwrap();
    let bytes = writer.finish();
    assert_eq!(bytes, vec![0x02, 0x0A, 0x00, 0x14, 0x00]);

    let mut cursor = ByteCursor::new(&bytes);
    let count = usize::from(cursor.read_u8().unwrap());
    let decoded = cursor
        .read_structures::<_, ByteError, _>(count, 2, |inner| inner.read_u16())
        .unwrap();
    assert_eq!(decoded, values);
}

#[test]
fn fixed_capacity_array_skips_unused_slots() {
    let mut writer = ByteWriter::new();
    writer.write_u8(1);
    writer
        .write_array::<u32, ByteError, _>(&[7], Some(3), 4, |inner, value| {
            inner.write_u32(*value);
            Ok(())
        })
        .unwrap();
    writer.write_u8(0xEE);
    let bytes = writer.finish();
    assert_eq!(bytes.len(), 1 + 12 + 1);

    let mut cursor = ByteCursor::new(&bytes);
    let count = usize::from(cursor.read_u8().unwrap());
    let items = cursor
        .read_structures::<_, ByteError, _>(count, 4, |inner| inner.read_u32())
        .unwrap();
    assert_eq!(items, vec![7]);
    assert_eq!(cursor.skip_padding((3 - count) * 4).unwrap(), 0);
    assert_eq!(cursor.read_u8().unwrap(), 0xEE);
}

#[test]
fn aligned_buffer_length() {
    let mut writer = ByteWriter::new();
    writer.write_bytes(&[1; 13]);
    writer.pad_to_alignment(4);
    assert_eq!(writer.len(), align4(13));
}
