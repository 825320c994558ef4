//! SQLite backed implementations of the store traits.

mod activation;
mod category;
mod expense;
mod priority;
mod user;

pub use activation::SQLiteActivationStore;
pub use category::SQLiteCategoryStore;
pub use expense::SQLiteExpenseStore;
pub use priority::SQLitePriorityStore;
pub use user::SQLiteUserStore;
