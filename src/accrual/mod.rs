pub mod client;
pub mod gate;
pub mod poller;
pub mod retry;

pub use gate::RateLimitGate;
