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

use dictation_core::DrillMode;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;

const MODES: [(DrillMode, &str); 3] = [
    (DrillMode::PrimaryOnly, "Dictation"),
    (DrillMode::PrimaryToSecondary, "Translate (hear primary)"),
    (DrillMode::SecondaryToPrimary, "Translate (hear secondary)"),
];

pub fn page_template(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "dictation" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
                script src="/script.js" {};
            }
        }
    }
}

fn mode_select(id: &str) -> Markup {
    html! {
        select id=(id) {
            @for (mode, label) in MODES {
                option value=(mode.as_str()) { (label) }
            }
        }
    }
}

/// The single-page quiz UI. Panels are toggled by the script.
pub fn index_page() -> Markup {
    let body = html! {
        main {
            h1 { "Dictation" }
            section #setup {
                div .source {
                    h2 { "Paste words" }
                    p .hint { "One per line. Use " code { "word - translation" } " for translation modes." }
                    textarea #words rows="10" {}
                    (mode_select("text-mode"))
                    button #start-text { "Start" }
                }
                div .source {
                    h2 { "From the dictionary" }
                    select #category-type {
                        option value="" { "All categories" }
                        option value="class" { "Classes" }
                        option value="lesson" { "Lessons" }
                        option value="topic" { "Topics" }
                    }
                    div #categories .choices {}
                    div #letters .choices {}
                    (mode_select("db-mode"))
                    p #word-count .hint {}
                    button #start-db { "Start" }
                }
            }
            section #quiz hidden {
                p #progress {}
                button #play { "Play" }
                input #answer type="text" autocomplete="off" autocapitalize="off" spellcheck="false";
                button #submit { "Check" }
                p #feedback {}
                p #running {}
            }
            section #results hidden {
                h2 { "Results" }
                p #grade {}
                p #summary {}
                table {
                    thead {
                        tr {
                            th { "Heard" }
                            th { "Expected" }
                            th { "Answer" }
                        }
                    }
                    tbody #mistakes {}
                }
                button #restart { "Again" }
                button #new-list { "New list" }
            }
            p #error .error {}
        }
    };
    page_template(body)
}
