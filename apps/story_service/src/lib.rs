pub mod app_module;
pub mod app_router;
pub mod core;
pub mod health;
pub mod prompts;
pub mod session;
pub mod story_idea;
pub mod view;
