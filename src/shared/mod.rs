pub mod clock;
pub mod retry;
pub mod shutdown;

pub use clock::{system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use retry::{retry_with_backoff, RetryConfig};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
