pub mod user;

pub use user::{ListUserResp, User, UserLogin, UserLoginResponse};
