use axum::http::{header, HeaderMap};
use mime::Mime;

pub const HATEOAS_JSON: &str = "application/vnd.codemaze.hateoas+json";
pub const API_ROOT_JSON: &str = "application/vnd.codemaze.apiroot+json";
pub const TEXT_CSV: &str = "text/csv";

/// Vendor media types ask for hypermedia when the subtype ends in `hateoas`.
pub fn is_hateoas(media_type: &Mime) -> bool {
    vendor_subtype(media_type).map_or(false, |s| s.ends_with("hateoas"))
}

pub fn is_api_root(media_type: &Mime) -> bool {
    vendor_subtype(media_type).map_or(false, |s| s.ends_with("apiroot"))
}

/// The subtype without its `+json` suffix, e.g. `vnd.codemaze.hateoas`.
fn vendor_subtype(media_type: &Mime) -> Option<&str> {
    let subtype = media_type.subtype().as_str();
    subtype.starts_with("vnd.").then_some(subtype)
}

/// Response body formats the API can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json; charset=utf-8",
            OutputFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// Parse `Accept` into media ranges ordered by descending `q`.
///
/// Entries that fail to parse are dropped; ties keep header order.
pub fn accepted_media_types(headers: &HeaderMap) -> Vec<Mime> {
    let Some(value) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
        return vec![];
    };

    let mut ranges: Vec<(f32, Mime)> = value
        .split(',')
        .filter_map(|part| part.trim().parse::<Mime>().ok())
        .map(|m| {
            let q = m.get_param("q").and_then(|q| q.as_str().parse::<f32>().ok()).unwrap_or(1.0);
            (q, m)
        })
        .filter(|(q, _)| *q > 0.0)
        .collect();
    ranges.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    ranges.into_iter().map(|(_, m)| m).collect()
}

/// Pick the output format for a request.
///
/// `None` means nothing the client accepts can be produced. CSV is only
/// offered where the caller allows it.
pub fn negotiate(headers: &HeaderMap, allow_csv: bool) -> Option<OutputFormat> {
    if headers.get(header::ACCEPT).is_none() {
        return Some(OutputFormat::Json);
    }

    accepted_media_types(headers).iter().find_map(|m| {
        let (type_, subtype) = (m.type_(), m.subtype());
        if type_ == mime::STAR && subtype == mime::STAR {
            Some(OutputFormat::Json)
        } else if type_ == mime::APPLICATION
            && (subtype == mime::STAR || subtype == mime::JSON || (m.suffix() == Some(mime::JSON) && vendor_subtype(m).is_some()))
        {
            Some(OutputFormat::Json)
        } else if allow_csv && type_ == mime::TEXT && (subtype == mime::CSV || subtype == mime::STAR) {
            Some(OutputFormat::Csv)
        } else {
            None
        }
    })
}
