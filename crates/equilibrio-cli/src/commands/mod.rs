pub mod config;
pub mod goal;
pub mod routine;
pub mod run;
pub mod settings;
pub mod status;
