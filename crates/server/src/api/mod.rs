pub mod errors;
pub mod handlers;
pub mod render;
pub mod server;

pub use server::{build_router, run_api};
