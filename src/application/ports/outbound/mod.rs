//! Outbound ports - Interfaces that the application requires from external systems

mod entity_client_port;

pub use entity_client_port::{EntityClientPort, FetchError, ListSlice};
