pub mod account;
pub mod auth;
pub mod comment;
pub mod donation;
pub mod event;
pub mod favorite;
pub mod health;
pub mod notification;
pub mod otp;
pub mod participant;
