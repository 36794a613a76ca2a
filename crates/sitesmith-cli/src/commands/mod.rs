//! Command implementations.

pub mod live;
pub mod models;
pub mod page;
pub mod pull;
pub mod serve;
pub mod site;

pub use self::live::execute_live;
pub use self::models::execute_models;
pub use self::page::execute_page;
pub use self::pull::{ensure_model, execute_pull};
pub use self::serve::{execute_serve, start_preview};
pub use self::site::execute_site;
