pub mod preview;
pub mod text;

pub use preview::{render, PreviewBlock, PreviewTree, SectionKind, PREVIEW_ANCHOR};
pub use text::to_plain_text;
