//! HTML template rendering handlers for the web pages.

mod dashboard;
mod home;
mod login;

pub use dashboard::{create_link_form_handler, dashboard_handler};
pub use home::{NoticeQuery, home_handler};
pub use login::{login_handler, login_submit_handler, logout_handler, signup_handler};
