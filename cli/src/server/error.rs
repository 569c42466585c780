use rocket::{
    Request, Response, catch,
    http::Status,
    response::{self, Responder},
    serde::json::Json,
};
use serde::Serialize;
use svara::synthesis::SynthesisError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub detail: String,
}

impl ApiError {
    pub fn new(
        status: Status,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<SynthesisError> for ApiError {
    fn from(error: SynthesisError) -> Self {
        let status = match &error {
            SynthesisError::InvalidRequest(_) => Status::UnprocessableEntity,
            SynthesisError::Prompt(_) => Status::InternalServerError,
            SynthesisError::Inference(_) => Status::BadGateway,
            SynthesisError::Timeout {
                ..
            } => Status::GatewayTimeout,
            SynthesisError::NoAudioContent => Status::InternalServerError,
            SynthesisError::CodecNotInitialized => Status::ServiceUnavailable,
        };
        Self::new(status, error.to_string())
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(
        self,
        request: &'r Request<'_>,
    ) -> response::Result<'static> {
        let body = Json(ErrorBody {
            detail: self.detail,
        })
        .respond_to(request)?;
        Response::build_from(body).status(self.status).ok()
    }
}

#[catch(default)]
pub fn handle_default_catcher(
    status: Status,
    _request: &Request<'_>,
) -> ApiError {
    let detail = status.reason().unwrap_or("Unknown error");
    ApiError::new(status, detail)
}
