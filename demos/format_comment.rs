//! Formats a sample documentation comment and prints the HTML, the listing
//! summary and the referenced images.
//!
//! Run with `RUST_LOG=debug` to see unresolved references.

use doc_comment_formatter::{ClassInfo, DocContext, DocFormatter, Member, Relations};
use tracing_subscriber::EnvFilter;

const COMMENT: &str = "\
Panel with a header and a body. Set the #title config to change the header,
or call {@link Ext.Component#show} to display it. Unknown {@link #frobnicate}
references are logged.

{@img panel.png Panel screenshot}

    @example preview
    Ext.create('Ext.Panel', { title: 'Hello' });
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut formatter = DocFormatter::new();
    formatter.set_relations(Relations::new([
        ClassInfo::new("Ext.Component").member(Member::method("show")),
        ClassInfo::new("Ext.Panel")
            .extends("Ext.Component")
            .member(Member::cfg("title")),
    ]));
    formatter.set_class_context("Ext.Panel");
    formatter.set_image_base_path("resources/images");
    formatter.set_doc_context(DocContext::new("Panel.js", 1));

    let rendered = formatter.format_rendered(COMMENT);
    println!("{}", rendered.html);

    if formatter.too_long(&rendered.html) {
        println!("Summary: {}", formatter.shorten(&rendered.html));
    }
    for image in &rendered.images {
        println!("Image: {} ({})", image.filename, image.alt);
    }
}
