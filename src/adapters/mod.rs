// Adapters layer: concrete collaborators for credentials, network identity and status output.

pub mod credentials;
pub mod network;
pub mod status_log;
