pub mod auth;
pub mod booking;
pub mod token_image;
pub mod validation;
pub mod verification;
