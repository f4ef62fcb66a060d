pub mod fetch_flow;
pub mod word_ctx;

pub use fetch_flow::{FetchFlow, FetchOutcome};
pub use word_ctx::WordCtx;
