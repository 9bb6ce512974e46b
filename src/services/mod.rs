// src/services/mod.rs

pub mod answer_key;
pub mod copy;
pub mod grading;
pub mod option;
pub mod ordering;
pub mod question;
pub mod survey;
pub mod validation;
