use actix_web::dev::ServiceRequest;
use actix_web::http::Method;
use actix_web_opentelemetry::RequestMetrics;
use opentelemetry::global;

type MetricsRoute = fn(&ServiceRequest) -> bool;

/// Request metrics middleware with a prometheus exporter on `/metrics`.
pub fn request_metrics() -> RequestMetrics<MetricsRoute> {
    let exporter = opentelemetry_prometheus::exporter().init();

    RequestMetrics::new(
        global::meter("bowl-pickem"),
        Some(is_metrics_route as MetricsRoute),
        Some(exporter),
    )
}

fn is_metrics_route(request: &ServiceRequest) -> bool {
    request.path() == "/metrics" && request.method() == Method::GET
}
