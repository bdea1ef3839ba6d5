pub mod body_limit;
pub mod panic;
pub mod timeout;

pub use body_limit::body_limit_middleware;
pub use panic::JsonPanicResponder;
pub use timeout::handle_timeout_error;
