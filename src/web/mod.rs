//! Request/response shell: HTML pages and a JSON API over [`DashboardService`].

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tera::{Context, Tera};
use tokio::net::TcpListener;

use crate::errors::{DashboardError, Result};
use crate::services::{Dashboard, DashboardService};
use crate::view;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("templates/base.html")),
    ("index.html", include_str!("templates/index.html")),
    ("dashboard.html", include_str!("templates/dashboard.html")),
    ("error.html", include_str!("templates/error.html")),
];

#[derive(Clone)]
pub struct AppState {
    service: Arc<DashboardService>,
    templates: Arc<Tera>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub company_name: String,
}

#[derive(Serialize)]
struct ChartView {
    element_id: &'static str,
    figure: String,
}

/// Load the templates embedded in the binary.
pub fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.to_vec())?;
    Ok(tera)
}

pub fn router(service: Arc<DashboardService>) -> Result<Router> {
    let state = AppState {
        service,
        templates: Arc::new(templates()?),
    };

    Ok(Router::new()
        .route("/", get(index))
        .route("/dashboard", post(dashboard))
        .route("/api/dashboard/:ticker", get(api_dashboard))
        .route("/health", get(health))
        .with_state(state))
}

pub async fn serve(service: Arc<DashboardService>) -> Result<()> {
    let addr = service.config().bind_addr.clone();
    let app = router(service)?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// HTTP status for an error shown to the user.
pub fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::UnresolvedInput { .. } => StatusCode::BAD_REQUEST,
        DashboardError::Fetch(e) if e.is_terminal() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index(State(state): State<AppState>) -> Response {
    render(&state.templates, "index.html", &Context::new(), StatusCode::OK)
}

async fn dashboard(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Response {
    match state.service.dashboard_for_input(&form.company_name).await {
        Ok(dashboard) => match dashboard_context(&dashboard) {
            Ok(context) => render(&state.templates, "dashboard.html", &context, StatusCode::OK),
            Err(e) => error_page(&state.templates, &e),
        },
        Err(e) => error_page(&state.templates, &e),
    }
}

async fn api_dashboard(State(state): State<AppState>, Path(ticker): Path<String>) -> Response {
    match state.service.dashboard_for_input(&ticker).await {
        Ok(dashboard) => Json(json!({
            "success": true,
            "ticker": dashboard.ticker,
            "data": dashboard.record,
            "charts": dashboard.charts,
            "figures": dashboard.figures(),
            "raw": dashboard.raw,
        }))
        .into_response(),
        Err(e) => (
            status_for(&e),
            Json(json!({
                "success": false,
                "error": { "kind": e.kind(), "message": e.to_string() },
            })),
        )
            .into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn dashboard_context(dashboard: &Dashboard) -> Result<Context> {
    let record = &dashboard.record;
    let mut sections = view::overview_sections(record);
    sections.extend(view::analysis_sections(record));

    let charts = dashboard
        .charts
        .iter()
        .map(|chart| -> Result<ChartView> {
            // The figure is inlined into a <script> block.
            let figure = serde_json::to_string(&chart.to_plotly())?.replace("</", "<\\/");
            Ok(ChartView {
                element_id: chart.id.element_id(),
                figure,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut context = Context::new();
    context.insert("ticker", &dashboard.ticker);
    context.insert("company", &record.identity.company);
    context.insert("sector", &record.identity.sector);
    context.insert("industry", &record.identity.industry);
    context.insert("country", &record.profile.country);
    context.insert("market_cap", &record.profile.market_cap);
    context.insert("description", &record.profile.description);
    context.insert("sections", &sections);
    context.insert("charts", &charts);
    context.insert("ratings", &record.ratings);
    context.insert(
        "raw_fields",
        &dashboard.raw.as_ref().map(view::raw_field_cards).unwrap_or_default(),
    );
    Ok(context)
}

fn error_page(templates: &Tera, err: &DashboardError) -> Response {
    let status = status_for(err);
    let heading = match err {
        DashboardError::UnresolvedInput { .. } => "Company not found",
        DashboardError::Fetch(_) => "No data for this symbol",
        _ => "Something went wrong",
    };
    let mut context = Context::new();
    context.insert("heading", heading);
    context.insert("message", &err.to_string());
    render(templates, "error.html", &context, status)
}

fn render(templates: &Tera, name: &str, context: &Context, status: StatusCode) -> Response {
    match templates.render(name, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render {}: {}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;

    #[test]
    fn embedded_templates_parse() {
        let tera = templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        for (name, _) in TEMPLATES {
            assert!(names.contains(&name), "{name} missing");
        }
    }

    #[test]
    fn error_statuses() {
        assert_eq!(
            status_for(&DashboardError::unresolved("x", "no match")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FetchError::NotFound("ZZZZ".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DashboardError::LookupError("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn error_page_escapes_the_message() {
        let tera = templates().unwrap();
        let err = DashboardError::unresolved("<script>", "no matching company or ticker symbol");
        let response = error_page(&tera, &err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Company not found"));
    }
}
