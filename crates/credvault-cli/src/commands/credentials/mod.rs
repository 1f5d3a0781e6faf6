//! Credential commands. Every handler authorizes the caller first and only
//! ever operates inside that caller's partition.

mod add;
mod delete;
mod get;
mod list;
mod update;

pub use add::handle_add;
pub use delete::handle_delete;
pub use get::handle_get;
pub use list::handle_list;
pub use update::handle_update;
