//! SeaORM entities, one module per table.

pub mod answer;
pub mod comment;
pub mod forum_post;
pub mod post;
pub mod tag;
pub mod user;
