//! Domain layer of the reference backend: in-memory tables, credentials,
//! bearer sessions and the reward policy.

pub mod database;
pub mod password;
pub mod reward_policy;
pub mod session;

pub use database::{Database, Tables, UserRecord};
pub use password::{hash_password, verify_password};
pub use reward_policy::RewardPolicy;
pub use session::{Session, new_token};
