pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
pub mod store;
pub mod window;

pub use memory::MemorySessionStore;
#[cfg(feature = "redis")]
pub use redis::RedisSessionStore;
pub use store::SessionStore;
pub use window::RevisionWindow;
