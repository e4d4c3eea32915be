#![no_main]
use libfuzzer_sys::fuzz_target;
use minprintf_core::{FormatArg, format_to_buffer, formatted_len};

/// Decode up to four arguments from the tail of the input. Each takes a tag
/// byte plus eight value bytes.
fn decode_args(data: &[u8]) -> Vec<FormatArg<'_>> {
    data.chunks_exact(9)
        .take(4)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&chunk[1..]);
            let bits = u64::from_le_bytes(raw);
            match chunk[0] % 7 {
                0 => FormatArg::I32(bits as i32),
                1 => FormatArg::I64(bits as i64),
                2 => FormatArg::U8(bits as u8),
                3 => FormatArg::U64(bits),
                4 => FormatArg::F64(f64::from_bits(bits)),
                5 => FormatArg::Str(&chunk[1..]),
                _ => FormatArg::Char(bits as u8),
            }
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte splits the input into format text and argument bytes.
    let split = (data[0] as usize).min(data.len() - 1);
    let format = &data[1..=split];
    let args = decode_args(&data[split + 1..]);

    let len = formatted_len(format, &args);
    // Skip huge precisions; the counting path already covered them.
    if len > 1 << 16 {
        return;
    }

    let mut full = vec![0u8; len + 1];
    assert_eq!(format_to_buffer(&mut full, format, &args), len);
    assert_eq!(full[len], 0);

    // Every capacity stores a prefix of the full output, NUL-terminated,
    // and never touches the guard.
    for capacity in [0, 1, len / 2, len.saturating_sub(1), len] {
        let mut buf = vec![0xA5u8; capacity + 4];
        let ret = format_to_buffer(&mut buf[..capacity], format, &args);
        assert_eq!(ret, len);
        if capacity > 0 {
            let stored = (capacity - 1).min(len);
            assert_eq!(&buf[..stored], &full[..stored]);
            assert_eq!(buf[stored], 0);
        }
        assert!(buf[capacity..].iter().all(|&b| b == 0xA5));
    }

    // Idempotence.
    let mut again = vec![0u8; len + 1];
    format_to_buffer(&mut again, format, &args);
    assert_eq!(again, full);
});
