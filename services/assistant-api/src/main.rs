//! HTTP front of the Oracle assistant.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::assistant::Assistant;
use shared::commands::{CommandSuggestion, COMMAND_SUGGESTIONS};
use shared::config::Settings;
use shared::dto::{AssistantRequest, AssistantResponse, ErrorResponse};
use shared::knowledge::KnowledgeBase;
use shared::openai_client::{DisabledModel, LanguageModel, OpenAiChat};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

type ApiError = (StatusCode, Json<ErrorResponse>);

async fn health() -> &'static str {
    "OK"
}

async fn list_commands() -> Json<&'static [CommandSuggestion]> {
    Json(COMMAND_SUGGESTIONS)
}

async fn ask(
    State(assistant): State<Arc<Assistant>>,
    body: Bytes,
) -> Result<Json<AssistantResponse>, ApiError> {
    let req: AssistantRequest = serde_json::from_slice(&body).map_err(internal_err)?;
    let Some(message) = req.message() else {
        return Err(bad_request());
    };

    match assistant.reply(message).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => {
            error!("knowledge base unavailable: {e}");
            Err(unavailable())
        }
    }
}

/* ---------------- error helpers ---------------- */

fn bad_request() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Mensagem é obrigatória".into(),
            answer: "Por favor, digite uma pergunta válida.".into(),
        }),
    )
}

fn unavailable() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Dados não disponíveis".into(),
            answer: "Desculpe, não consegui acessar a base de conhecimento no momento. \
                     Tente novamente em alguns instantes."
                .into(),
        }),
    )
}

fn internal_err<E: std::fmt::Display>(e: E) -> ApiError {
    error!("assistant endpoint error: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Erro interno do servidor".into(),
            answer: "Desculpe, ocorreu um erro interno. Nossa equipe técnica foi notificada \
                     e está trabalhando para resolver o problema."
                .into(),
        }),
    )
}

fn app(assistant: Arc<Assistant>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/commands", get(list_commands))
        .route("/api/assistant", post(ask))
        .with_state(assistant)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn language_model(settings: &Settings) -> Arc<dyn LanguageModel> {
    if !settings.llm_enabled() {
        info!("no OpenAI key configured, answering from the knowledge base only");
        return Arc::new(DisabledModel);
    }
    match OpenAiChat::from_settings(settings) {
        Ok(chat) => Arc::new(chat),
        Err(e) => {
            warn!("OpenAI client unavailable, answering from the knowledge base only: {e}");
            Arc::new(DisabledModel)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging via RUST_LOG
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = Settings::new().unwrap_or_else(|e| {
        warn!("invalid settings, using defaults: {e}");
        Settings::default()
    });

    let knowledge = KnowledgeBase::new(&settings.knowledge_base_path, settings.reload_knowledge_base);
    let assistant = Arc::new(Assistant::new(knowledge, language_model(&settings)));

    let addr: std::net::SocketAddr = settings.bind_addr.parse()?;
    info!(
        %addr,
        knowledge_base = %settings.knowledge_base_path,
        model = %settings.openai_model,
        "starting assistant-api"
    );
    axum::Server::bind(&addr)
        .serve(app(assistant).into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use shared::knowledge::Corpus;
    use shared::openai_client::{LlmAnswer, LlmError};
    use tower::ServiceExt;

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn answer(&self, question: &str, _corpus: &Corpus) -> Result<LlmAnswer, LlmError> {
            Ok(LlmAnswer {
                answer: format!("eco: {question}"),
                model: "echo".into(),
            })
        }
    }

    fn corpus() -> Corpus {
        Corpus::from_json(
            r#"{"processos": [{
                "id": "1",
                "titulo": "Férias",
                "categoria": "RH",
                "tags": ["ferias", "rh"],
                "pergunta": "Como solicitar férias?",
                "resposta": "Peça ao seu gestor."
            }]}"#,
        )
        .unwrap()
    }

    fn test_app(corpus: Corpus, model: Arc<dyn LanguageModel>) -> Router {
        app(Arc::new(Assistant::new(KnowledgeBase::from_corpus(corpus), model)))
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/assistant")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let app = test_app(corpus(), Arc::new(DisabledModel));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn answers_from_knowledge_base() {
        let app = test_app(corpus(), Arc::new(DisabledModel));
        let (status, body) = post_json(app, r#"{"message": "quero tirar ferias"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "answer": "Peça ao seu gestor.",
                "categoria": "RH",
                "titulo": "Férias",
                "source": "knowledge_base"
            })
        );
    }

    #[tokio::test]
    async fn answers_from_model_when_available() {
        let app = test_app(corpus(), Arc::new(EchoModel));
        let (status, body) = post_json(app, r#"{"message": "  /ferias "}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "eco: Como solicitar férias?");
        assert_eq!(body["source"], "llm");
    }

    #[tokio::test]
    async fn off_topic_gets_help_text() {
        let app = test_app(corpus(), Arc::new(DisabledModel));
        let (status, body) = post_json(app, r#"{"message": "qual a capital da frança"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categoria"], "Ajuda Geral");
        assert_eq!(body["titulo"], "Tópicos Disponíveis");
        assert!(body["answer"].as_str().unwrap().contains("• Férias"));
    }

    #[tokio::test]
    async fn blank_or_missing_message_is_rejected() {
        for payload in [r#"{"message": "   "}"#, r#"{}"#, r#"{"message": 7}"#] {
            let app = test_app(corpus(), Arc::new(DisabledModel));
            let (status, body) = post_json(app, payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
            assert_eq!(body["error"], "Mensagem é obrigatória");
        }
    }

    #[tokio::test]
    async fn empty_knowledge_base_is_unavailable() {
        let app = test_app(Corpus::default(), Arc::new(DisabledModel));
        let (status, body) = post_json(app, r#"{"message": "oi"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Dados não disponíveis");
    }

    #[tokio::test]
    async fn malformed_body_is_internal_error() {
        let app = test_app(corpus(), Arc::new(DisabledModel));
        let (status, body) = post_json(app, "not json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Erro interno do servidor");
    }

    #[tokio::test]
    async fn lists_commands() {
        let app = test_app(corpus(), Arc::new(DisabledModel));
        let req = Request::builder().uri("/api/commands").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(COMMAND_SUGGESTIONS.len()));
        assert_eq!(body[4]["prefix"], "/ferias");
    }
}
