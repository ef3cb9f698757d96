use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::media::{negotiate, OutputFormat};
use crate::error::ApiError;

/// Types that can be written as CSV lines.
pub trait CsvRows {
    fn write_csv(&self, writer: &mut csv::Writer<Vec<u8>>) -> csv::Result<()>;
}

impl<T: CsvRows> CsvRows for Vec<T> {
    fn write_csv(&self, writer: &mut csv::Writer<Vec<u8>>) -> csv::Result<()> {
        for item in self {
            item.write_csv(writer)?;
        }
        Ok(())
    }
}

/// Render rows without a header line; text fields are quoted.
pub fn to_csv<T: CsvRows + ?Sized>(rows: &T) -> Result<String, ApiError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(Vec::new());
    rows.write_csv(&mut writer).map_err(csv_error)?;
    let bytes = writer.into_inner().map_err(|e| csv_error(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::internal_server_error(format!("CSV output is not UTF-8: {}", e)))
}

fn csv_error(err: csv::Error) -> ApiError {
    ApiError::internal_server_error(format!("Failed to write CSV: {}", err))
}

/// Output format negotiated from `Accept`; JSON or CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiate(pub OutputFormat);

impl Negotiate {
    /// Negotiate by hand when the acceptable formats depend on the request.
    pub fn from_headers(headers: &HeaderMap, allow_csv: bool) -> Result<OutputFormat, ApiError> {
        negotiate(headers, allow_csv).ok_or_else(not_acceptable)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Negotiate {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, true).map(Negotiate)
    }
}

/// Guard for resources that only have a JSON representation.
#[derive(Debug, Clone, Copy)]
pub struct AcceptJson;

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AcceptJson {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match negotiate(&parts.headers, false) {
            Some(OutputFormat::Json) => Ok(AcceptJson),
            _ => Err(not_acceptable()),
        }
    }
}

fn not_acceptable() -> ApiError {
    ApiError::not_acceptable("None of the requested media types can be produced.")
}

/// A response body rendered in the negotiated format.
pub struct Formatted<T> {
    pub format: OutputFormat,
    pub status: StatusCode,
    pub body: T,
}

impl<T> Formatted<T> {
    pub fn new(format: OutputFormat, body: T) -> Self {
        Self { format, status: StatusCode::OK, body }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize + CsvRows> Formatted<T> {
    pub fn render(self) -> Result<Response, ApiError> {
        let body = match self.format {
            OutputFormat::Json => serde_json::to_string(&self.body)
                .map_err(|e| ApiError::internal_server_error(format!("Failed to serialize response: {}", e)))?,
            OutputFormat::Csv => to_csv(&self.body)?,
        };
        let content_type = HeaderValue::from_static(self.format.content_type());
        Ok((self.status, [(header::CONTENT_TYPE, content_type)], body).into_response())
    }
}

impl<T: Serialize + CsvRows> IntoResponse for Formatted<T> {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }
}
