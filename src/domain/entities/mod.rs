//! Core domain entities.
//!
//! - [`ShortLink`] - a stored short link with embedded [`Analytics`]
//! - [`NewShortLink`] - input for inserting a link
//! - [`ClickSample`] - one visit, classified and timestamped
//! - [`CurrentUser`] - the authenticated owner a request acts for

pub mod analytics;
pub mod current_user;
pub mod link;

pub use analytics::{Analytics, BrowserName, ClickSample, DeviceClass};
pub use current_user::CurrentUser;
pub use link::{NewShortLink, ShortLink};
