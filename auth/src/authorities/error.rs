use crate::scope;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Scopes(#[from] scope::Error),
}

#[cfg(feature = "actix")]
impl actix_web::ResponseError for Error {
    fn status_code(&self) -> actix_http::StatusCode {
        match self {
            Self::InvalidArgument(_) => actix_http::StatusCode::BAD_REQUEST,
            Self::Scopes(_) => actix_http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse<actix_http::body::BoxBody> {
        use cloudsec_common::error::ErrorInformation;

        let mut res = actix_web::HttpResponse::build(self.status_code());
        res.insert_header(actix_web::http::header::ContentType::json());

        match self {
            Self::InvalidArgument(_) => res.json(ErrorInformation::new("InvalidArgument", self)),
            Self::Scopes(err) => res.json(ErrorInformation {
                details: format!("{err:?}"),
                ..ErrorInformation::new("Unauthorized", self)
            }),
        }
    }
}
