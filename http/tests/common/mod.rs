#![allow(dead_code)]


pub use running::Running;
