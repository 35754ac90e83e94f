pub mod story_idea_prompt;
