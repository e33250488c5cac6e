pub mod build;
pub mod list;
pub mod publish;
