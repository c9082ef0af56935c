pub mod params;
pub mod ports;

pub use params::update_params;
pub use ports::update_ports;
