// src/models/mod.rs

pub mod exam;
pub mod notification;
pub mod question;
pub mod result;
pub mod user;
