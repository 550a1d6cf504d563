//! Database access for vocabox-we

pub mod word_ext;
