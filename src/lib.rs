pub mod cleaning;
pub mod http_client;
pub mod pick_rate_store;
pub mod pool_fetch;
pub mod present;
pub mod rankings;
pub mod refresh_job;
pub mod request;
