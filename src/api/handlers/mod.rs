//! HTTP request handlers.

pub mod health;
pub mod shorties;

pub use health::health_handler;
pub use shorties::{
    create_shorty_handler, delete_shorty_by_pair_handler, delete_shorty_handler,
    find_shorty_handler, get_shorty_handler, list_shorties_handler, update_shorty_handler,
};
