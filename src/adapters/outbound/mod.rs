/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod catalogers;
pub mod console;
pub mod encoders;
pub mod filesystem;
