pub mod axis;
pub mod axis_store;
pub mod beam_splitter;
pub mod constants;
pub mod deviation;
pub mod fluence;
pub mod log_decoder;
pub mod trajlog_errors;
