pub mod genre;
pub mod story_idea_controller;
pub mod story_idea_request;
pub mod story_idea_service;
