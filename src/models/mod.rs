pub mod airly_installation;
pub mod airly_measurements;
pub mod airly_meta;
pub mod discord;
