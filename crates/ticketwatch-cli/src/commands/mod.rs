pub mod clear;
pub mod count;
pub mod list;
pub mod receive;
pub mod show;
