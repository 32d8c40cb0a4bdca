mod branch;
mod repository;
mod user;

pub use branch::GhBranch;
pub use repository::GhRepository;
pub use user::GhUser;
