pub mod notification_consumer;
