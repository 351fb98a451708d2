#![no_main]

use doc_comment_formatter::DocFormatter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let mut formatter = DocFormatter::new();
    formatter.set_max_length(data[0] as usize);
    let _ = formatter.too_long(&String::from_utf8_lossy(&data[1..]));
    let _ = formatter.shorten(&String::from_utf8_lossy(&data[1..]));
});
