pub mod config;
pub mod logging;

pub mod checksum;
pub mod clock;
pub mod fetch;
pub mod git;
pub mod index;
pub mod local_sync;
pub mod merge;
pub mod pipeline;
pub mod process;
pub mod readme;
pub mod retry;
pub mod url_model;
