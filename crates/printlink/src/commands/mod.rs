pub mod init;
pub mod instances;
pub mod plugins;
pub mod send;
pub mod status;
pub mod version;
