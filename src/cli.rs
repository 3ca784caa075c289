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
use std::process::exit;
use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use clap::Subcommand;
use dictation_core::ErrorKind;
use dictation_core::ErrorReport;
use dictation_core::Fallible;
use dictation_core::Languages;
use dictation_core::fail;
use tokio::spawn;

use crate::audio::tts::DEFAULT_TTS_URL;
use crate::audio::tts::GoogleTranslateTts;
use crate::cmd::dictionary::clear_words;
use crate::cmd::dictionary::import_file;
use crate::cmd::dictionary::init_database;
use crate::cmd::dictionary::print_stats;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::utils::wait_for_server;

const DEFAULT_DATABASE: &str = "words_database.db";

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Run the dictation web interface.
    Serve {
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Path to the SQLite dictionary.
        #[arg(long, default_value = DEFAULT_DATABASE)]
        database: PathBuf,
        /// Directory where synthesized audio is cached.
        #[arg(long, default_value = "audio_cache")]
        audio_dir: PathBuf,
        /// Language code of the dictated words.
        #[arg(long, default_value = "ru")]
        primary_language: String,
        /// Language code of the translations.
        #[arg(long, default_value = "en")]
        secondary_language: String,
        /// Minutes of inactivity after which a session is forgotten.
        #[arg(long, default_value_t = 120)]
        session_ttl_minutes: i64,
        /// Speech synthesis endpoint.
        #[arg(long, default_value = DEFAULT_TTS_URL)]
        tts_url: String,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Manage the word dictionary.
    Db {
        /// Path to the SQLite dictionary.
        #[arg(long, global = true, default_value = DEFAULT_DATABASE)]
        database: PathBuf,
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Subcommand)]
enum DbCommand {
    /// Create the dictionary tables.
    Init,
    /// Print word and category counts.
    Stats,
    /// Import categories and words from a TOML file.
    Import {
        /// Path to the dictionary file.
        file: PathBuf,
    },
    /// Delete every word, keeping categories and letters.
    Clear,
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            host,
            port,
            database,
            audio_dir,
            primary_language,
            secondary_language,
            session_ttl_minutes,
            tts_url,
            open_browser,
        } => {
            if primary_language == secondary_language {
                return fail(
                    ErrorKind::Validation,
                    "primary and secondary languages must differ",
                );
            }
            let session_ttl = Duration::try_minutes(session_ttl_minutes)
                .filter(|ttl| *ttl > Duration::zero())
                .ok_or_else(|| ErrorReport::validation("invalid session TTL"))?;
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                host,
                port,
                database,
                audio_dir,
                languages: Languages::new(primary_language, secondary_language),
                session_ttl,
                synthesizer: Arc::new(GoogleTranslateTts::new(tts_url)),
            };
            start_server(config).await
        }
        Command::Db { database, command } => match command {
            DbCommand::Init => init_database(&database),
            DbCommand::Stats => print_stats(&database),
            DbCommand::Import { file } => import_file(&database, &file),
            DbCommand::Clear => clear_words(&database),
        },
    }
}
