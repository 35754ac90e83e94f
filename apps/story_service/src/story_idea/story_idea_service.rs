use std::sync::Arc;

use story_llm::LLMClient;

use super::story_idea_request::GenerationRequest;
use crate::{prompts::story_idea_prompt::StoryIdeaPrompt, session::session_echo::SessionEcho};

/// The prompt that went to the model and the echo it produced.
#[derive(Debug, Clone)]
pub struct GeneratedIdea {
    pub prompt: String,
    pub echo: SessionEcho,
}

#[derive(Clone)]
pub struct StoryIdeaService {
    llm_client: Arc<LLMClient>,
}

impl StoryIdeaService {
    pub fn new(llm_client: LLMClient) -> Self {
        Self {
            llm_client: Arc::new(llm_client),
        }
    }

    /// Builds the prompt for `request`, sends it once and pairs the outcome
    /// with the request.
    pub async fn generate(&self, request: GenerationRequest) -> GeneratedIdea {
        let prompt = StoryIdeaPrompt::get_prompt(&request);

        tracing::info!(
            genre = %request.genre(),
            keyword = request.keyword().unwrap_or_default(),
            "Generating story idea"
        );
        tracing::debug!("Full prompt sent to model:\n{}", prompt);

        let outcome = self
            .llm_client
            .generate(&prompt, &StoryIdeaPrompt::parameters())
            .await;

        tracing::info!(genre = %request.genre(), outcome = outcome.kind(), "Story idea finished");

        GeneratedIdea {
            prompt,
            echo: SessionEcho::new(request, outcome),
        }
    }

    pub async fn regenerate(&self, previous: &SessionEcho) -> GeneratedIdea {
        self.generate(previous.request.clone()).await
    }
}
