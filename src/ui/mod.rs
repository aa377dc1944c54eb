pub mod filters;
pub mod login;
pub mod pages;
pub mod panels;
pub mod table;
