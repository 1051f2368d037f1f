pub mod blocks;
pub mod friend_categories;
pub mod friend_requests;
pub mod friendships;
pub mod notifications;
pub mod user_settings;
pub mod users;
