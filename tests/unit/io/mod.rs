mod error;
mod image;
