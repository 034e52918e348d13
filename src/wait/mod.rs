pub mod conditions;
pub mod implicit;
pub mod retry;
pub mod waiter;

pub use conditions::Condition;
pub use implicit::ImplicitWaitGuard;
pub use retry::{RetryError, RetryPolicy};
pub use waiter::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, Wait, WaitError, hard_wait};
