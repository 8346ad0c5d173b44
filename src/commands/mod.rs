pub mod commit;
pub mod install_hook;
pub mod message;
pub mod setup;
pub mod test;
