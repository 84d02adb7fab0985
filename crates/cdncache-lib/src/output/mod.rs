mod template;

pub use template::{TEMPLATE_SEPARATOR, render_block, rewrite_document, rewrite_template_file};
