pub mod auth;
pub mod docs;
pub mod model;
pub mod post;
pub mod search;
pub mod tag;
pub mod user;
