mod server;
mod handlers;
mod routes;
mod streaming;

pub use server::StreamingServer;
