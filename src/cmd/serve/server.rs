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

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::from_fn_with_state;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use chrono::Duration;
use dictation_core::Fallible;
use dictation_core::Languages;
use tokio::net::TcpListener;
use tokio::signal;

use crate::audio::cache::AudioCache;
use crate::audio::tts::SpeechSynthesizer;
use crate::cmd::serve::api::audio_handler;
use crate::cmd::serve::api::categories_handler;
use crate::cmd::serve::api::check_answer_handler;
use crate::cmd::serve::api::count_words_handler;
use crate::cmd::serve::api::current_word_handler;
use crate::cmd::serve::api::generate_audio_handler;
use crate::cmd::serve::api::letters_handler;
use crate::cmd::serve::api::logout_handler;
use crate::cmd::serve::api::reset_handler;
use crate::cmd::serve::api::results_handler;
use crate::cmd::serve::api::save_words_handler;
use crate::cmd::serve::api::session_layer;
use crate::cmd::serve::api::words_from_db_handler;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::SessionStore;
use crate::cmd::serve::template::index_page;
use crate::db::Database;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub audio_dir: PathBuf,
    pub languages: Languages,
    pub session_ttl: Duration,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let db = Database::new(&config.database)?;
    let audio = AudioCache::new(
        &config.audio_dir,
        config.synthesizer,
        config.languages.clone(),
    )?;
    log::info!(
        "Using dictionary {} and audio cache {}",
        config.database.display(),
        config.audio_dir.display()
    );

    let state = ServerState {
        languages: config.languages,
        db: Arc::new(Mutex::new(db)),
        sessions: Arc::new(Mutex::new(SessionStore::new(config.session_ttl))),
        audio: Arc::new(audio),
    };

    // Routes that read or change the caller's quiz need a session.
    let sessioned = Router::new();
    let sessioned = sessioned.route("/", get(index_handler));
    let sessioned = sessioned.route("/api/save_words", post(save_words_handler));
    let sessioned = sessioned.route("/api/get_words_from_db", post(words_from_db_handler));
    let sessioned = sessioned.route("/api/get_current_word", get(current_word_handler));
    let sessioned = sessioned.route("/api/check_answer", post(check_answer_handler));
    let sessioned = sessioned.route("/api/get_results", get(results_handler));
    let sessioned = sessioned.route("/api/reset_session", post(reset_handler));
    let sessioned = sessioned.route("/api/logout", post(logout_handler));
    let sessioned = sessioned.route_layer(from_fn_with_state(state.clone(), session_layer));

    let app = Router::new();
    let app = app.merge(sessioned);
    let app = app.route("/api/get_categories", get(categories_handler));
    let app = app.route("/api/get_letters", get(letters_handler));
    let app = app.route("/api/count_words", post(count_words_handler));
    let app = app.route("/api/generate_audio", post(generate_audio_handler));
    let app = app.route("/audio/{file}", get(audio_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    log::info!("Starting server on http://{bind}/");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn index_handler() -> Html<String> {
    Html(index_page().into_string())
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::error!("Failed to install Ctrl+C handler: {e}");
            // Without a signal handler, run until the process is killed.
            std::future::pending::<()>().await;
        }
    }
}
