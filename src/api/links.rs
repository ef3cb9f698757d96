use axum::http::{header, HeaderMap};
use mime::Mime;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::api::media::is_hateoas;
use crate::api::shaping::{DataShaper, ShapedEntity};
use crate::dto::EmployeeDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl std::fmt::Display, rel: &str, method: &str) -> Self {
        Self { href: href.to_string(), rel: rel.to_string(), method: method.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkCollectionWrapper<T> {
    pub value: Vec<T>,
    pub links: Vec<Link>,
}

/// Body of a shaped collection response, with or without hypermedia.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LinkResponse {
    Shaped(Vec<Map<String, Value>>),
    Linked(LinkCollectionWrapper<Map<String, Value>>),
}

impl LinkResponse {
    pub fn has_links(&self) -> bool {
        matches!(self, LinkResponse::Linked(_))
    }
}

/// Request details needed to build absolute links.
#[derive(Debug, Clone)]
pub struct LinkContext {
    base_url: Url,
    pub media_type: Mime,
}

impl LinkContext {
    pub fn new(base_url: Url, media_type: Mime) -> Self {
        Self { base_url, media_type }
    }

    /// Scheme from `X-Forwarded-Proto` (default `http`), authority from `Host`.
    pub fn from_headers(headers: &HeaderMap, media_type: Mime) -> Result<Self, url::ParseError> {
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or("http").trim().to_string())
            .filter(|s| s == "http" || s == "https")
            .unwrap_or_else(|| "http".to_string());
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");

        let base_url = Url::parse(&format!("{}://{}/", scheme, host))?;
        Ok(Self { base_url, media_type })
    }

    pub fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

/// Adds hypermedia to shaped employee listings when the client asked for it.
pub struct EmployeeLinks;

impl EmployeeLinks {
    pub fn try_generate_links(
        employees: &[EmployeeDto],
        fields: Option<&str>,
        company_id: Uuid,
        ctx: &LinkContext,
    ) -> Result<LinkResponse, serde_json::Error> {
        let shaped = DataShaper::shape_data(employees, fields)?;

        if is_hateoas(&ctx.media_type) {
            return Ok(Self::linked(shaped, fields, company_id, ctx));
        }

        Ok(LinkResponse::Shaped(shaped.into_iter().map(|s| s.entity).collect()))
    }

    fn linked(shaped: Vec<ShapedEntity>, fields: Option<&str>, company_id: Uuid, ctx: &LinkContext) -> LinkResponse {
        let value = shaped
            .into_iter()
            .map(|ShapedEntity { id, mut entity }| {
                let links = Self::employee_links(ctx, company_id, id, fields);
                entity.insert("links".to_string(), serde_json::to_value(links).unwrap_or(Value::Null));
                entity
            })
            .collect();

        let self_href = ctx.url(&format!("api/companies/{}/employees", company_id));
        LinkResponse::Linked(LinkCollectionWrapper {
            value,
            links: vec![Link::new(self_href, "self", "GET")],
        })
    }

    fn employee_links(ctx: &LinkContext, company_id: Uuid, id: Uuid, fields: Option<&str>) -> Vec<Link> {
        let resource = ctx.url(&format!("api/companies/{}/employees/{}", company_id, id));

        let mut self_href = resource.clone();
        if let Some(fields) = fields.filter(|f| !f.trim().is_empty()) {
            self_href.query_pairs_mut().append_pair("fields", fields);
        }

        vec![
            Link::new(self_href, "self", "GET"),
            Link::new(resource.clone(), "delete_employee", "DELETE"),
            Link::new(resource.clone(), "update_employee", "PUT"),
            Link::new(resource, "partially_update_employee", "PATCH"),
        ]
    }
}

/// Links advertised by the API root document.
pub fn root_links(ctx: &LinkContext) -> Vec<Link> {
    vec![
        Link::new(ctx.url("api"), "self", "GET"),
        Link::new(ctx.url("api/companies"), "companies", "GET"),
        Link::new(ctx.url("api/companies"), "create_company", "POST"),
    ]
}
