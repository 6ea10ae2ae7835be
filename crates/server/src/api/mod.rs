pub mod cards;
pub mod catalogs;
pub mod entries;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod sets;

pub use routes::create_router;
