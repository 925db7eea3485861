pub mod feedback;
mod lenient;
pub mod registration;
