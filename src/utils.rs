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

use std::time::Duration;

use dictation_core::Fallible;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use tokio::net::TcpStream;
use tokio::time::sleep;

// max-age is one week in seconds.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=604800, immutable";

/// Characters escaped when a cached file name is put in a URL path.
const FILE_NAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

pub async fn wait_for_server(host: &str, port: u16) -> Fallible<()> {
    loop {
        if let Ok(stream) = TcpStream::connect(format!("{host}:{port}")).await {
            drop(stream);
            break;
        }
        sleep(Duration::from_millis(1)).await;
    }
    Ok(())
}

/// The URL a cached recording is served from.
pub fn audio_url(file_name: &str) -> String {
    format!("/audio/{}", utf8_percent_encode(file_name, FILE_NAME_ESCAPES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_url() {
        assert_eq!(audio_url("cat_en.mp3"), "/audio/cat_en.mp3");
        assert_eq!(audio_url("кот_ru.mp3"), "/audio/%D0%BA%D0%BE%D1%82_ru.mp3");
    }
}
