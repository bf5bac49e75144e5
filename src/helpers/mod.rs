//! Helper functions shared by the page templates and the content layer

mod html;
mod url;

pub use self::html::*;
pub use self::url::*;
