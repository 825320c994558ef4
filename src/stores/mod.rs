//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod activation;
mod category;
mod expense;
mod priority;
mod user;

pub mod sqlite;

pub use activation::ActivationStore;
pub use category::CategoryStore;
pub use expense::{ExpenseData, ExpenseQuery, ExpenseStore, MonthlyTotal};
pub use priority::PriorityStore;
pub use user::UserStore;

pub use sqlite::{
    SQLiteActivationStore, SQLiteCategoryStore, SQLiteExpenseStore, SQLitePriorityStore,
    SQLiteUserStore,
};
