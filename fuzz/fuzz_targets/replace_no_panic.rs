#![no_main]

use doc_comment_formatter::{ClassInfo, DocFormatter, Member, Relations};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut formatter = DocFormatter::new();
        formatter.set_relations(Relations::new([
            ClassInfo::new("Ext.Panel").member(Member::method("show"))
        ]));
        formatter.set_class_context("Ext.Panel");

        let _ = formatter.render(input);
        let _ = formatter.format(input);
    }
});
