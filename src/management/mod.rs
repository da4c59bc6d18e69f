mod auth;

pub use auth::Clock;
pub use auth::SystemClock;
pub use auth::TokenManager;
pub use auth::TokenStatus;
