pub mod account;
pub mod comment;
pub mod donation;
pub mod event;
pub mod favorite;
pub mod notification;
pub mod otp;
pub mod participant;
