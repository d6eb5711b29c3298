pub mod daemon;
pub mod health;
pub mod inbox;
pub mod init;
pub mod register;
pub mod send;
pub mod version;

pub use daemon::Daemon;
pub use health::Health;
pub use inbox::Inbox;
pub use init::Init;
pub use register::Register;
pub use send::SendMessage;
pub use version::Version;
