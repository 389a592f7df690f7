pub mod constant;
pub mod keyword;
pub mod punctuator;
pub mod string;
