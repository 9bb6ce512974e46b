// src/models/mod.rs

pub mod exam_record;
pub mod option;
pub mod question;
pub mod survey;
