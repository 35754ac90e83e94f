use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use story_llm::GenerationOutcome;

use super::{
    genre::Genre, story_idea_request::GenerationRequest, story_idea_service::GeneratedIdea,
};
use crate::{
    app_module::AppState,
    core::error::AppError,
    session::session_echo::SessionEcho,
    view::page::{render_page, Notice, PageView},
};

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StoryIdeaRequest {
    pub genre: String,
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoryIdeaResponse {
    pub genre: Genre,
    pub keyword: Option<String>,
    pub prompt: String,
    pub outcome: GenerationOutcome,
}

/// HTML pages served to the browser.
pub fn page_router() -> Router {
    Router::new()
        .route("/", get(show_page))
        .route("/generate", post(generate_from_form))
        .route("/regenerate", post(regenerate))
}

/// JSON access to the same generation flow.
pub fn story_idea_router() -> Router {
    Router::new().route("/generate", post(generate_story_idea))
}

pub async fn show_page(Extension(ctx): Extension<AppState>, headers: HeaderMap) -> Html<String> {
    let echo = SessionEcho::from_headers(&headers);
    Html(render_page(&PageView::from_echo(
        echo.as_ref(),
        &ctx.model_name,
    )))
}

pub async fn generate_from_form(
    Extension(ctx): Extension<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Response {
    let keyword = form.keyword.unwrap_or_default();

    let genre = match form.genre.as_deref().unwrap_or_default().parse::<Genre>() {
        Ok(genre) => genre,
        Err(e) => {
            tracing::warn!("Rejected generation request: {}", e);
            let echo = SessionEcho::from_headers(&headers);
            let mut view = PageView::from_echo(echo.as_ref(), &ctx.model_name);
            view.keyword = &keyword;
            view.notice = Some(Notice::Warning("Please select a genre.".to_string()));
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(render_page(&view))).into_response();
        }
    };

    let request = GenerationRequest::new(genre, Some(keyword));
    let idea = ctx.service.story_idea_service.generate(request).await;

    remember_and_redirect(&idea.echo)
}

pub async fn regenerate(Extension(ctx): Extension<AppState>, headers: HeaderMap) -> Response {
    let Some(previous) = SessionEcho::from_headers(&headers) else {
        tracing::debug!("Regenerate requested without a previous idea");
        return Redirect::to("/").into_response();
    };

    let idea = ctx.service.story_idea_service.regenerate(&previous).await;

    remember_and_redirect(&idea.echo)
}

pub async fn generate_story_idea(
    Extension(ctx): Extension<AppState>,
    Json(request): Json<StoryIdeaRequest>,
) -> Result<Json<StoryIdeaResponse>, AppError> {
    let genre = request.genre.parse::<Genre>()?;
    let request = GenerationRequest::new(genre, request.keyword);

    let GeneratedIdea { prompt, echo } = ctx.service.story_idea_service.generate(request).await;

    Ok(Json(StoryIdeaResponse {
        genre: echo.request.genre(),
        keyword: echo.request.keyword().map(str::to_string),
        prompt,
        outcome: echo.outcome,
    }))
}

fn remember_and_redirect(echo: &SessionEcho) -> Response {
    let mut response = Redirect::to("/").into_response();
    if let Some(cookie) = echo.set_cookie() {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
