use rocket::{
    Request, Response,
    fairing::{Fairing, Info, Kind},
    http::Status,
    options,
};

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const EXPOSE_HEADERS: &str = "X-Sample-Rate, X-Bit-Depth, X-Channels, X-Decoded-Frames, X-Failed-Frames";

/// Adds CORS headers to every response. A `*` entry allows any origin; otherwise the
/// request origin is echoed back only when listed.
pub struct Cors {
    allow_origins: Vec<String>,
}

impl Cors {
    pub fn new(allow_origins: Vec<String>) -> Self {
        Self {
            allow_origins,
        }
    }

    fn allowed_origin(
        &self,
        origin: Option<&str>,
    ) -> Option<String> {
        if self.allow_origins.iter().any(|allowed| allowed == "*") {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.allow_origins.iter().find(|allowed| allowed.as_str() == origin).cloned()
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(
        &self,
        request: &'r Request<'_>,
        response: &mut Response<'r>,
    ) {
        let Some(origin) = self.allowed_origin(request.headers().get_one("Origin")) else {
            return;
        };

        if origin != "*" {
            response.set_raw_header("Vary", "Origin");
        }
        response.set_raw_header("Access-Control-Allow-Origin", origin);
        response.set_raw_header("Access-Control-Allow-Methods", ALLOW_METHODS);
        response.set_raw_header("Access-Control-Allow-Headers", "*");
        response.set_raw_header("Access-Control-Expose-Headers", EXPOSE_HEADERS);
    }
}

#[options("/<_..>")]
pub fn handle_preflight() -> Status {
    Status::NoContent
}
