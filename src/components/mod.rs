pub mod auth_nav;
pub mod chat;
pub mod markdown;
pub mod messagelist;
pub mod threadlist;
pub mod toast;
