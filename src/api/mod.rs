pub mod health;
pub mod register;
pub mod swagger;
