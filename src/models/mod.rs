pub mod callables;
pub mod counters;
pub mod events;
pub mod friend_categories;
pub mod friend_requests;
pub mod relationships;
