pub mod activity;
pub mod actor;
pub mod assign;
pub mod audit;
pub mod create;
pub mod dispatch;
pub mod list;
pub mod shared;
pub mod timeline;
pub mod transition;
