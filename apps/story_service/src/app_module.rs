use story_llm::LLMClient;

use crate::story_idea::story_idea_service::StoryIdeaService;

#[derive(Clone)]
pub struct AppService {
    pub story_idea_service: StoryIdeaService,
}

impl AppService {
    pub fn new(llm_client: LLMClient) -> Self {
        let story_idea_service = StoryIdeaService::new(llm_client);

        Self { story_idea_service }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub model_name: String,
}

impl AppState {
    pub fn new(llm_client: LLMClient, model_name: impl Into<String>) -> Self {
        Self {
            service: AppService::new(llm_client),
            model_name: model_name.into(),
        }
    }
}
