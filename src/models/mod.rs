//! The domain models of the application and their supporting types.

mod activation;
mod category;
mod expense;
mod password;
mod priority;
mod user;

pub use activation::{ACTIVATION_TOKEN_LENGTH, ActivationRecord, generate_activation_token};
pub use category::{Category, CategoryName};
pub use expense::Expense;
pub use password::{PasswordHash, ValidatedPassword};
pub use priority::{Priority, PriorityName};
pub use user::{User, UserID, UserProfile};

/// An alias for the integer row IDs used by the application's database.
pub type DatabaseID = i64;
