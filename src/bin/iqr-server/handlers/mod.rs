pub mod api;
pub mod calc;
pub mod export;
pub mod into_body;

pub(crate) use api::{handle_random, handle_stats, handle_upload};
pub(crate) use calc::handle_calc;
pub(crate) use export::handle_export;
