pub mod apply;
pub mod check;
pub mod init;
pub mod list;
pub mod percent;
pub mod remove;
pub mod set;
pub mod update;
