//! Configuration module

mod site;

pub use site::ConfigError;
pub use site::ContentConfig;
pub use site::MailConfig;
pub use site::RecaptchaConfig;
pub use site::SiteConfig;
