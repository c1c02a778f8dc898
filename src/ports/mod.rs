//! Port traits (hexagonal boundary).

pub mod config_port;
pub mod sales_data_port;
