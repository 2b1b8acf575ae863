//! Request handlers for the compilation endpoints.
//!
//! Each handler is a thin translation layer: deserialize the request, call
//! the core, serialize the core's own result type. Syntactic problems in the
//! submitted CDL are diagnostics inside a `200` payload, since the parser
//! always returns a best-effort AST. Transport-level problems (malformed
//! body, oversized payload, timeout) are non-`200` with a `message` body.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cdl_parser::cdl::compiler::{compile, lex, parse, CompileMode, CompileOptions};
use cdl_parser::cdl::pipeline::StageList;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct SourceRequest {
    pub cdl: String,
}

#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    pub cdl: String,
    #[serde(default = "default_pipeline")]
    pub pipeline: StageList,
}

fn default_pipeline() -> StageList {
    StageList::full()
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Map an extractor rejection to its own status (`400` for syntax, `413`
/// for an oversized body, …) with the `{"message"}` error shape.
fn bad_request(rejection: JsonRejection) -> Response {
    debug!("rejected request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ErrorBody {
            message: rejection.body_text(),
        }),
    )
        .into_response()
}

/// POST `/lex` - tokenize the submitted source.
///
/// Returns `200` with the semantic token array; malformed spans appear as
/// `error` tokens inside the array, never as an HTTP failure.
pub async fn lex_handler(body: Result<Json<SourceRequest>, JsonRejection>) -> Response {
    match body {
        Ok(Json(request)) => Json(lex(&request.cdl)).into_response(),
        Err(rejection) => bad_request(rejection),
    }
}

/// POST `/parse` - parse the submitted source.
///
/// Returns `200` with `{ast, diagnostics}`. Syntax errors in the input are
/// recovered into error nodes and reported in `diagnostics`.
pub async fn parse_handler(body: Result<Json<SourceRequest>, JsonRejection>) -> Response {
    match body {
        Ok(Json(request)) => Json(parse(&request.cdl)).into_response(),
        Err(rejection) => bad_request(rejection),
    }
}

/// POST `/compile` - full compile with a pipeline.
///
/// `pipeline` is a preset name or an explicit stage-name array; it defaults
/// to `"full"`. Returns `200` with the `CompilationResult`.
pub async fn compile_handler(body: Result<Json<CompileRequest>, JsonRejection>) -> Response {
    match body {
        Ok(Json(request)) => {
            let options = CompileOptions {
                pipeline: request.pipeline,
                mode: CompileMode::Full,
            };
            Json(compile(&request.cdl, &options)).into_response()
        }
        Err(rejection) => bad_request(rejection),
    }
}
