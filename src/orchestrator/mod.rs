pub mod run_processor;

pub use run_processor::App;
