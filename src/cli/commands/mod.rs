pub mod completions;
pub mod create;
pub mod current;
pub mod delete;
pub mod list;
pub mod refresh;
pub mod switch;
