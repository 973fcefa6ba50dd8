pub mod postgres;

pub use postgres::{create_pool, load_catalog, load_usernames, run_migrations};
