pub mod echo;
pub mod health;


pub use echo::echo_handler;
pub use health::health_handler;
