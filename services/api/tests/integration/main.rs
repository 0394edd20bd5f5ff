
mod account_test;
mod event_test;
mod interaction_test;
mod otp_test;
