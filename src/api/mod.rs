pub mod handlers;
pub mod routes;
pub mod upload;
