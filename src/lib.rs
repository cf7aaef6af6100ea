pub mod aggregate;
pub mod catalog;
pub mod export;
pub mod extract;
pub mod http_client;
pub mod reconcile;
pub mod squad_info;
pub mod stats_dataset;
pub mod stats_fetch;
