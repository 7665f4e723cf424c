// Adapters layer: concrete implementations for external systems (http, console, agent variables).

pub mod http;
pub mod progress;
pub mod task_variables;
