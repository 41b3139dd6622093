pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

/// Logical channel this bridge serves. The socket file name and every
/// client of the daemon key off this string.
pub const CHANNEL_NAME: &str = "wallbridge/wallpaper";
