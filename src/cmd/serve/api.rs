// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON endpoints driving the quiz.

use axum::Extension;
use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::COOKIE;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use dictation_core::CurrentWord;
use dictation_core::DrillMode;
use dictation_core::ErrorReport;
use dictation_core::Fallible;
use dictation_core::Report;
use dictation_core::RunningStats;
use dictation_core::Stats;
use dictation_core::pairs_from_entries;
use dictation_core::parse_word_pairs;
use serde::Deserialize;
use serde::Serialize;

use crate::cmd::serve::error::ApiError;
use crate::cmd::serve::state::SESSION_COOKIE;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::SessionId;
use crate::cmd::serve::state::session_cookie;
use crate::db::Category;
use crate::db::CategoryType;
use crate::db::LetterCount;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::audio_url;

/// A successful response: the body's fields next to `"success": true`.
#[derive(Serialize)]
pub struct Success<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

type ApiResult<T> = Result<Json<Success<T>>, ApiError>;

fn ok<T: Serialize>(body: T) -> ApiResult<T> {
    Ok(Json(Success {
        success: true,
        body,
    }))
}

#[derive(Serialize)]
pub struct Empty {}

fn parse_mode(mode: Option<&str>) -> Fallible<DrillMode> {
    match mode {
        Some(mode) => mode.parse(),
        None => Ok(DrillMode::default()),
    }
}

/// Attach a session to every request, minting one if the client has none.
pub async fn session_layer(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session_cookie)
        .map(str::to_string);
    let now = chrono::Local::now().naive_local();
    let (id, fresh) = match state.sessions() {
        Ok(mut sessions) => sessions.resolve(cookie.as_deref(), now),
        Err(e) => return ApiError(e).into_response(),
    };
    request.extensions_mut().insert(id.clone());
    let mut response = next.run(request).await;
    if fresh {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

#[derive(Deserialize)]
pub struct SaveWordsRequest {
    #[serde(default)]
    words: String,
    mode: Option<String>,
}

#[derive(Serialize)]
pub struct TotalWords {
    total_words: usize,
}

pub async fn save_words_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
    payload: Result<Json<SaveWordsRequest>, JsonRejection>,
) -> ApiResult<TotalWords> {
    let Json(request) = payload?;
    let mode = parse_mode(request.mode.as_deref())?;
    let pairs = parse_word_pairs(&request.words, mode);
    let total_words = state.with_session(&id, |session| {
        session.quiz.load(pairs, mode, &mut session.rng)
    })?;
    log::info!("Loaded {total_words} words from text ({mode})");
    ok(TotalWords { total_words })
}

#[derive(Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    category_ids: Vec<i64>,
    #[serde(default)]
    letter_ids: Vec<i64>,
    mode: Option<String>,
}

pub async fn words_from_db_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<TotalWords> {
    let Json(request) = payload?;
    let mode = parse_mode(request.mode.as_deref())?;
    let entries = state
        .db()?
        .find_words(&request.category_ids, &request.letter_ids)?;
    let pairs = pairs_from_entries(entries, mode);
    if pairs.is_empty() {
        return Err(ErrorReport::validation("no words for filters").into());
    }
    let total_words = state.with_session(&id, |session| {
        session.quiz.load(pairs, mode, &mut session.rng)
    })?;
    log::info!("Loaded {total_words} words from the dictionary ({mode})");
    ok(TotalWords { total_words })
}

#[derive(Deserialize)]
pub struct CategoriesQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Serialize)]
pub struct Categories {
    categories: Vec<Category>,
}

pub async fn categories_handler(
    State(state): State<ServerState>,
    query: Result<Query<CategoriesQuery>, QueryRejection>,
) -> ApiResult<Categories> {
    let Query(query) = query?;
    let kind: Option<CategoryType> = match query.kind.as_deref() {
        Some("") | None => None,
        Some(kind) => Some(kind.parse()?),
    };
    let categories = state.db()?.list_categories(kind)?;
    ok(Categories { categories })
}

#[derive(Deserialize)]
pub struct LettersQuery {
    category_id: Option<i64>,
}

#[derive(Serialize)]
pub struct Letters {
    letters: Vec<LetterCount>,
}

pub async fn letters_handler(
    State(state): State<ServerState>,
    query: Result<Query<LettersQuery>, QueryRejection>,
) -> ApiResult<Letters> {
    let Query(query) = query?;
    let letters = state.db()?.list_letters_with_counts(query.category_id)?;
    ok(Letters { letters })
}

#[derive(Serialize)]
pub struct Count {
    count: usize,
}

pub async fn count_words_handler(
    State(state): State<ServerState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Count> {
    let Json(request) = payload?;
    let mode = parse_mode(request.mode.as_deref())?;
    let count = state
        .db()?
        .count_words(&request.category_ids, &request.letter_ids, mode)?;
    ok(Count { count })
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum CurrentWordBody {
    Word {
        finished: bool,
        current_index: usize,
        total_words: usize,
        speak_word: String,
        speak_lang: String,
        mode: DrillMode,
    },
    Finished {
        finished: bool,
        stats: Stats,
    },
}

pub async fn current_word_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
) -> ApiResult<CurrentWordBody> {
    let current = state.with_session(&id, |session| session.quiz.current())?;
    let body = match current {
        CurrentWord::Word(question) => CurrentWordBody::Word {
            finished: false,
            current_index: question.index,
            total_words: question.total,
            speak_word: question.speak_word,
            speak_lang: state.languages.code(question.speak_side).to_string(),
            mode: question.mode,
        },
        CurrentWord::Finished(stats) => CurrentWordBody::Finished {
            finished: true,
            stats,
        },
    };
    ok(body)
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    answer: String,
}

#[derive(Serialize)]
pub struct AnswerBody {
    is_correct: bool,
    correct_word: String,
    heard_word: String,
    stats: RunningStats,
}

pub async fn check_answer_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> ApiResult<AnswerBody> {
    let Json(request) = payload?;
    let answer = request.answer.trim();
    let verdict = state.with_session(&id, |session| session.quiz.submit(answer))?;
    ok(AnswerBody {
        is_correct: verdict.is_correct,
        correct_word: verdict.correct_word,
        heard_word: verdict.heard_word,
        stats: verdict.running,
    })
}

#[derive(Deserialize)]
pub struct AudioRequest {
    #[serde(default)]
    word: String,
    lang: Option<String>,
}

#[derive(Serialize)]
pub struct AudioUrl {
    audio_url: String,
}

pub async fn generate_audio_handler(
    State(state): State<ServerState>,
    payload: Result<Json<AudioRequest>, JsonRejection>,
) -> ApiResult<AudioUrl> {
    let Json(request) = payload?;
    let lang = request
        .lang
        .unwrap_or_else(|| state.languages.primary.clone());
    let cached = state.audio.fetch(&request.word, &lang).await?;
    log::debug!("Audio ready at {}", cached.path.display());
    ok(AudioUrl {
        audio_url: audio_url(&cached.file_name),
    })
}

pub async fn audio_handler(
    State(state): State<ServerState>,
    Path(file_name): Path<String>,
) -> Result<(StatusCode, [(HeaderName, &'static str); 2], Vec<u8>), ApiError> {
    let bytes = state.audio.load(&file_name).await?;
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "audio/mpeg"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    ))
}

pub async fn results_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
) -> ApiResult<Report> {
    let report = state.with_session(&id, |session| Ok(session.quiz.report()))?;
    ok(report)
}

pub async fn reset_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
) -> ApiResult<Empty> {
    state.with_session(&id, |session| {
        session.quiz.reset(&mut session.rng);
        Ok(())
    })?;
    ok(Empty {})
}

pub async fn logout_handler(
    State(state): State<ServerState>,
    Extension(id): Extension<SessionId>,
) -> Result<Response, ApiError> {
    state.sessions()?.remove(&id);
    log::debug!("Ended session {id}");
    let mut response = ok(Empty {})?.into_response();
    let expired = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if let Ok(value) = HeaderValue::from_str(&expired) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}
