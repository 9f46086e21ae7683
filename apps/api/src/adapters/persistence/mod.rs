pub mod user;

pub use user::InMemoryUserRepo;
