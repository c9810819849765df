pub mod attendance;
pub mod employee;
pub mod faq;
pub mod visitor;
