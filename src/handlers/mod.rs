// src/handlers/mod.rs

pub mod exam;
pub mod option;
pub mod question;
pub mod survey;
