pub mod document;
pub mod guest;
pub mod project;
pub mod public;
pub mod settings;
pub mod whatsapp;
