use story_llm::GenerationParameters;

use crate::story_idea::story_idea_request::GenerationRequest;

pub struct StoryIdeaPrompt;

impl StoryIdeaPrompt {
    pub fn get_prompt(request: &GenerationRequest) -> String {
        let mut parts = vec![
            format!(
                "Generate a short, unique, and intriguing story idea for a {} story.",
                request.genre()
            ),
            "The idea should be a single paragraph, sparking curiosity and suggesting conflict or mystery."
                .to_string(),
            "Avoid cliches if possible.".to_string(),
        ];

        if let Some(keyword) = request.keyword() {
            parts.push(format!(
                "The story should somehow incorporate the keyword: '{}'.",
                keyword
            ));
        }

        parts.push(
            "Make the idea compelling enough that someone would want to read or write this story."
                .to_string(),
        );

        parts.join("\n")
    }

    pub fn parameters() -> GenerationParameters {
        GenerationParameters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story_idea::genre::Genre;

    fn keywords() -> [Option<String>; 4] {
        [
            None,
            Some(String::new()),
            Some("   ".to_string()),
            Some("hidden artifact".to_string()),
        ]
    }

    #[test]
    fn every_genre_and_keyword_shape_obeys_the_contract() {
        for genre in Genre::ALL {
            for keyword in keywords() {
                let request = GenerationRequest::new(genre, keyword.clone());
                let prompt = StoryIdeaPrompt::get_prompt(&request);

                assert!(prompt.contains(genre.name()));
                assert_eq!(prompt, StoryIdeaPrompt::get_prompt(&request));

                let non_blank = keyword.as_deref().is_some_and(|k| !k.trim().is_empty());
                assert_eq!(prompt.contains("hidden artifact"), non_blank);
                assert_eq!(prompt.contains("incorporate the keyword"), non_blank);
            }
        }
    }

    #[test]
    fn sections_come_in_fixed_order() {
        let request = GenerationRequest::new(Genre::Mystery, Some("hidden artifact".to_string()));
        let prompt = StoryIdeaPrompt::get_prompt(&request);
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Generate a short, unique, and intriguing story idea for a Mystery story.",
                "The idea should be a single paragraph, sparking curiosity and suggesting conflict or mystery.",
                "Avoid cliches if possible.",
                "The story should somehow incorporate the keyword: 'hidden artifact'.",
                "Make the idea compelling enough that someone would want to read or write this story.",
            ]
        );
    }

    #[test]
    fn parameters_are_fixed() {
        let parameters = StoryIdeaPrompt::parameters();
        assert_eq!(parameters.temperature, 0.8);
        assert_eq!(parameters.top_p, 0.95);
        assert_eq!(parameters.top_k, 40);
        assert_eq!(parameters.max_output_tokens, 250);
    }
}
