//! 도메인 모델.

mod repository;
mod role;
mod token;
mod user;

pub use repository::{RoleRepository, UserRepository};
pub use role::{Claim, Role};
pub use token::TokenPair;
pub use user::{LoginRequest, ProfileUpdate, RegisterRequest, User};
