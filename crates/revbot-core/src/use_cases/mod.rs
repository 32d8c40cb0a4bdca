pub mod pulls;
pub mod retrieval;
pub mod reviews;
pub mod users;
