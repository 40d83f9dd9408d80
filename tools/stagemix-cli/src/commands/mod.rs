pub mod layout;
pub mod replay;
pub mod validate;
