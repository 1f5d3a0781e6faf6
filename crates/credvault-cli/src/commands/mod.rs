pub mod credentials;
pub mod init;
pub mod maintenance;
pub mod principal;
