mod auth;
mod health_check;
mod tasks;

pub use auth::current_user;
pub use auth::login;
pub use auth::refresh;
pub use auth::register;
pub use health_check::health_check;
pub use tasks::create_task;
pub use tasks::delete_task;
pub use tasks::list_tasks;
pub use tasks::update_task;
