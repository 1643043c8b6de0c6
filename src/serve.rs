//! Practice in the browser: a single page plus a small JSON API.
use crate::error::{SessionError, StoreError};
use crate::narration::Narrate;
use crate::review::Review;
use crate::store::CardStore;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::trace::TraceLayer;

/// Store and the running review, shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<Practice>>,
}

struct Practice {
    store: CardStore,
    review: Option<Review>,
    narrator: Arc<dyn Narrate>,
    seed: Option<u64>,
}

impl Practice {
    /// The running review, started on first use. `EmptyDeck` without cards.
    fn review(&mut self) -> Result<&mut Review, SessionError> {
        if self.review.is_none() {
            let review = Review::seeded(
                self.store.cards().to_vec(),
                self.seed,
                self.narrator.clone(),
            )?;
            log::info!("practice started with {} cards", self.store.len());
            self.review = Some(review);
        }
        self.review.as_mut().ok_or(SessionError::EmptyDeck)
    }
}

impl AppState {
    pub fn new(store: CardStore, narrator: Arc<dyn Narrate>, seed: Option<u64>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Practice {
                store,
                review: None,
                narrator,
                seed,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Practice> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmptyQuestion | StoreError::EmptyAnswer => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Both fields are required!".into(),
            },
            e => {
                log::error!("failed to save card: {e}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct Grade {
    correct: bool,
}

#[derive(Debug, Deserialize, Serialize)]
struct NewCard {
    question: String,
    answer: String,
}

async fn index() -> Html<&'static str> {
    Html(PAGE)
}

async fn current_view(State(state): State<AppState>) -> Json<Value> {
    let mut practice = state.lock();
    match practice.review() {
        Ok(review) => Json(json!(review.view())),
        Err(_) => Json(json!({ "empty": true })),
    }
}

async fn reveal(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut practice = state.lock();
    let review = practice.review()?;
    review.reveal()?;
    Ok(Json(json!(review.view())))
}

async fn grade(
    State(state): State<AppState>,
    Json(params): Json<Grade>,
) -> Result<Json<Value>, ApiError> {
    let mut practice = state.lock();
    let review = practice.review()?;
    review.grade(params.correct)?;
    Ok(Json(json!(review.view())))
}

/// Adding a card restarts the session so the new card is in the rotation.
async fn add_card(
    State(state): State<AppState>,
    Json(params): Json<NewCard>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut practice = state.lock();
    let card = practice.store.add(&params.question, &params.answer)?.clone();
    practice.review = None;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "card": card, "total": practice.store.len() })),
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/state", get(current_view))
        .route("/api/reveal", post(reveal))
        .route("/api/grade", post(grade))
        .route("/api/cards", post(add_card))
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    log::info!("listening on {local}");
    println!("open http://{local}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("failed to listen for ctrl-c: {e}");
            }
        })
        .await?;
    Ok(())
}

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Practice Mode</title>
    <style>
        body {
            margin: 0;
            padding: 0;
            font-family: Arial, sans-serif;
        }
        #header {
            position: fixed;
            top: 0;
            left: 0;
            right: 0;
            background-color: #4CAF50;
            color: white;
            text-align: center;
            padding: 10px;
        }
        .content {
            margin-top: 50px;
            margin-bottom: 80px;
            padding: 20px;
        }
        #card {
            font-size: 22px;
            white-space: pre-wrap;
            min-height: 8em;
            padding: 10px;
            border: 1px solid #ddd;
            border-radius: 5px;
        }
        #error {
            color: #F44336;
        }
        .footer {
            position: fixed;
            bottom: 0;
            left: 0;
            right: 0;
            display: flex;
            justify-content: center;
            padding: 10px;
            background-color: white;
        }
        .button {
            margin: 0 10px;
            padding: 10px 20px;
            font-size: 16px;
            border: none;
            border-radius: 5px;
            cursor: pointer;
        }
        #correct {
            background-color: #4CAF50;
            color: white;
        }
        #incorrect {
            background-color: #F44336;
            color: white;
        }
        #showanswer {
            background-color: #2196F3;
            color: white;
        }
        textarea {
            width: 100%;
            height: 4em;
        }
    </style>
</head>
<body>

    <div id="header">Progress</div>

    <div class="content">
        <div id="card"></div>
        <p id="error"></p>

        <details>
            <summary>Add Flashcard</summary>
            <p>Question:</p>
            <textarea id="question"></textarea>
            <p>Answer:</p>
            <textarea id="answer"></textarea>
            <p><button class="button" onclick="addCard()">Submit</button></p>
        </details>
    </div>

    <div class="footer">
        <button id="showanswer" class="button" onclick="post('/api/reveal')">Show Answer</button>
        <button id="correct"    class="button" onclick="post('/api/grade', {correct: true})" style="display: none;">Correct</button>
        <button id="incorrect"  class="button" onclick="post('/api/grade', {correct: false})" style="display: none;">Incorrect</button>
    </div>

    <script>
        function render(view) {
            document.getElementById('error').textContent = '';
            if (view.empty) {
                document.getElementById('header').textContent = 'No Cards';
                document.getElementById('card').textContent = 'Please add flashcards first.';
                document.getElementById('showanswer').style.display = 'none';
                document.getElementById('correct').style.display = 'none';
                document.getElementById('incorrect').style.display = 'none';
                return;
            }
            document.getElementById('header').textContent = view.progress_text;
            document.getElementById('card').textContent = view.text;
            document.getElementById('showanswer').style.display = view.can_reveal ? '' : 'none';
            document.getElementById('correct').style.display = view.can_grade ? '' : 'none';
            document.getElementById('incorrect').style.display = view.can_grade ? '' : 'none';
        }

        function refresh() {
            fetch('/api/state')
                .then(response => response.json())
                .then(render);
        }

        function post(path, body) {
            /* avoid double click */
            document.getElementById('showanswer').style.display = 'none';
            document.getElementById('correct').style.display = 'none';
            document.getElementById('incorrect').style.display = 'none';

            fetch(path, {
                method: 'POST',
                headers: {
                    'Content-Type': 'application/json'
                },
                body: JSON.stringify(body || {})
            })
            .then(response => response.json())
            .then(data => {
                if (data.error) {
                    refresh();
                    document.getElementById('error').textContent = data.error;
                } else {
                    render(data);
                }
            })
            .catch((error) => {
                console.error('Error:', error);
            });
        }

        function addCard() {
            const question = document.getElementById('question');
            const answer = document.getElementById('answer');
            fetch('/api/cards', {
                method: 'POST',
                headers: {
                    'Content-Type': 'application/json'
                },
                body: JSON.stringify({ question: question.value, answer: answer.value })
            })
            .then(response => response.json())
            .then(data => {
                if (data.error) {
                    alert(data.error);
                } else {
                    question.value = '';
                    answer.value = '';
                    alert('Flashcard added!');
                    refresh();
                }
            });
        }

        refresh();
    </script>

</body>
</html>
"#;
