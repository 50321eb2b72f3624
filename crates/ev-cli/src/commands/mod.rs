pub mod audit;
pub mod dispatch;
pub mod init;
pub mod link;
pub mod list;
pub mod record;
pub mod shared;
pub mod topics;
