pub mod password;
pub mod roles;
pub mod token;
