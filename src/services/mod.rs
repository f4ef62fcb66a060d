pub mod duplicate_resolver;
pub mod label_extract;

pub use duplicate_resolver::DuplicateResolver;
pub use label_extract::canonical_label;
