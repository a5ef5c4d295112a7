//! Outbound messaging channels

mod twilio;

pub use twilio::TwilioMessenger;
