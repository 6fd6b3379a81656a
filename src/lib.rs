//! EHCP Review Report Generator
//!
//! Joins student records, teacher feedback and grade tables on the student name
//! and renders one review report per student.

pub mod data;
pub mod gui;
pub mod pipeline;
pub mod report;
